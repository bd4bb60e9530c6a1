//! Formatted output helpers for the samples.
//!
//! The samples print inputs and results as flat sequences, row-major 2D
//! grids, or plane-by-plane 3D volumes. Values are space-separated; rows end
//! with a newline, planes with a blank line.

use std::fmt::Display;

/// Print all items on one line, space-separated.
pub fn print_all<'a, T, I>(items: I)
where
    T: Display + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut first = true;
    for item in items {
        if first {
            print!("{item}");
            first = false;
        } else {
            print!(" {item}");
        }
    }
    println!();
}

/// Print a row-major 2D grid, one row per line.
///
/// # Panics
///
/// Panics when `data.len()` is not a multiple of `width`.
pub fn print_grid<T: Display>(data: &[T], width: usize) {
    assert!(width > 0, "grid width must be nonzero");
    assert_eq!(data.len() % width, 0, "grid data is not a whole number of rows");
    for row in data.chunks(width) {
        print_all(row);
    }
}

/// Print a 3D volume as a sequence of `rows x cols` planes separated by
/// blank lines.
///
/// # Panics
///
/// Panics when `data.len()` is not a multiple of `rows * cols`.
pub fn print_planes<T: Display>(data: &[T], rows: usize, cols: usize) {
    let plane = rows * cols;
    assert!(plane > 0, "plane extent must be nonzero");
    assert_eq!(data.len() % plane, 0, "volume data is not a whole number of planes");
    for slab in data.chunks(plane) {
        print_grid(slab, cols);
        println!();
    }
}

/// Print a diagnostic message to stderr.
pub fn printe(message: impl Display) {
    eprintln!("{message}");
}
