//! Sine of a 6x6 matrix sampled around -pi, staged through local memory
//! with two slots per group member.
//!
//! Each member loads into its first slot, writes the sine into its second,
//! and stores from there - the multiplier form of the staged pattern.

use std::f32::consts::PI;

use lockstep_core::{staged, Buffer, Extent, NdRange, Queue, Task};
use lockstep_util::print_grid;

const SIDE: u32 = 6;
const LSIZE: u32 = 3;

fn main() -> lockstep_core::Result<()> {
    lockstep_tracing::init_default();

    let queue = Queue::new()?;

    let size = (SIDE * SIDE) as usize;
    let mut values: Vec<f32> = (0..size).map(|i| -PI + i as f32 * PI / 20.0).collect();

    {
        let mut buffer = Buffer::from_slice(&mut values, Extent::d2(SIDE, SIDE))?;
        let range = NdRange::new(Extent::d2(SIDE, SIDE), Extent::d2(LSIZE, LSIZE))?;

        let mut task = Task::new(range);
        let acc = task.bind_read_write(&mut buffer)?;
        let lm = task.local_staging::<f32>(2)?;
        staged::load(&mut task, acc, lm, 0);
        staged::map(&mut task, lm, 0, 1, |x| x.sin());
        staged::store(&mut task, lm, 1, acc);
        queue.submit(task)?;
    }

    print_grid(&values, SIDE as usize);
    Ok(())
}
