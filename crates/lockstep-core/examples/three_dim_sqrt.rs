//! Square root over a 3D nd-range with two staging slots per member.
//!
//! A 4x4x6 volume in 2x2x2 groups, with separate read-only source and
//! write-only destination bindings. Every group is granted
//! `ls0 x ls1 x ls2 * 2` staging elements, so each member stages its source
//! value and its result side by side.

use lockstep_core::{staged, Buffer, Extent, NdRange, Queue, Task};
use lockstep_util::{iota, print_planes};

const LS0: u32 = 2;
const LS1: u32 = 2;
const LS2: u32 = 2; // local range: 2x2x2
const GS0: u32 = LS0 * 2;
const GS1: u32 = LS1 * 2;
const GS2: u32 = LS2 * 3; // global range: 4x4x6

fn main() -> lockstep_core::Result<()> {
    lockstep_tracing::init_default();

    let queue = Queue::new()?;

    let mut src = vec![0.0f32; (GS0 * GS1 * GS2) as usize];
    iota(&mut src, 1.0);
    let mut dst = vec![0.0f32; src.len()];

    {
        let src_buff = Buffer::from_slice(&mut src, Extent::d3(GS0, GS1, GS2))?;
        let mut dst_buff = Buffer::from_slice(&mut dst, Extent::d3(GS0, GS1, GS2))?;
        let range = NdRange::new(Extent::d3(GS0, GS1, GS2), Extent::d3(LS0, LS1, LS2))?;

        let mut task = Task::new(range);
        let src_acc = task.bind_read(&src_buff)?;
        let dst_acc = task.bind_write(&mut dst_buff)?;
        let lm = task.local_staging::<f32>(2)?;
        staged::load(&mut task, src_acc, lm, 0);
        staged::map(&mut task, lm, 0, 1, |x| x.sqrt());
        staged::store(&mut task, lm, 1, dst_acc);
        queue.submit(task)?;
    }

    println!("--------------------------------------------------------------------------------");
    println!("src vector: ----");
    print_planes(&src, GS1 as usize, GS2 as usize);

    println!("--------------------------------------------------------------------------------");
    println!("dst vector: ----");
    print_planes(&dst, GS1 as usize, GS2 as usize);
    Ok(())
}
