//! Lanewise squaring of 4-lane vectors, staged through local memory.
//!
//! Elements are `[u32; 4]` lanes; each member stages its vector, squares
//! every lane, and stores it back. The selection chain prefers the GPU and
//! falls back to the CPU engine, aborting with a diagnostic only when the
//! whole chain fails.

use lockstep_core::{staged, Buffer, DeviceKind, Extent, NdRange, Queue, Task};
use lockstep_util::{iota_lanes, printe};

type Position = [u32; 4];

const LW: u32 = 2;
const LH: u32 = 2;
const GW: u32 = LW * 2;
const GH: u32 = LH * 8;

fn print_map(map: &[Position]) {
    for row in map.chunks(GW as usize) {
        for pos in row {
            print!("( {} {} {} {} )  ", pos[0], pos[1], pos[2], pos[3]);
        }
        println!();
    }
}

fn main() -> lockstep_core::Result<()> {
    lockstep_tracing::init_default();

    let queue = match Queue::with_policies(&[DeviceKind::Gpu, DeviceKind::Cpu]) {
        Ok(queue) => queue,
        Err(err) => {
            printe(format!("device selection failed: {err}"));
            std::process::exit(1);
        }
    };

    let mut map: Vec<Position> = vec![[0; 4]; (GW * GH) as usize];
    iota_lanes(&mut map, 1);

    println!("=>");
    print_map(&map);

    {
        let mut buff = Buffer::from_slice(&mut map, Extent::d2(GH, GW))?;
        let range = NdRange::new(Extent::d2(GH, GW), Extent::d2(LH, LW))?;

        let mut task = Task::new(range);
        let acc = task.bind_read_write(&mut buff)?;
        let lm = task.local_staging::<Position>(1)?;
        staged::load(&mut task, acc, lm, 0);
        staged::map(&mut task, lm, 0, 0, |v: Position| v.map(|lane| lane * lane));
        staged::store(&mut task, lm, 0, acc);
        queue.submit(task)?;
    }

    println!("=>");
    print_map(&map);
    Ok(())
}
