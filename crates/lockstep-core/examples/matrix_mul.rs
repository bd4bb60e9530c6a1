//! 4x4 matrix multiplication with a per-member accumulator in local
//! memory.
//!
//! The reduction variant of the staged pattern: the accumulator slot is
//! zeroed, then one accumulate stage runs per reduction step - so the group
//! barrier sits inside the reduction, once per partial sum - and a final
//! stage stores the result. The stage list is built from the matrix side
//! at task-construction time, never from item data, which keeps the
//! barrier count identical across every member.

use lockstep_core::{Buffer, Extent, NdRange, Queue, ReadAccess, Task, WriteAccess};
use lockstep_util::print_grid;

const SIDE: u32 = 4;
const LSIZE: u32 = 2;

fn main() -> lockstep_core::Result<()> {
    lockstep_tracing::init_default();

    let queue = Queue::new()?;

    #[rustfmt::skip]
    let mut mat1 = vec![
        1, 2, 3, 4,
        3, 2, 1, 4,
        2, 1, 3, 4,
        4, 3, 1, 2,
    ];
    #[rustfmt::skip]
    let mut mat2 = vec![
        1, 1, 2, 1,
        2, 1, 3, 2,
        3, 3, 1, 4,
        2, 1, 2, 3,
    ];
    let mut mat3 = vec![0i32; (SIDE * SIDE) as usize];

    {
        let buff1 = Buffer::from_slice(&mut mat1, Extent::d2(SIDE, SIDE))?;
        let buff2 = Buffer::from_slice(&mut mat2, Extent::d2(SIDE, SIDE))?;
        let mut buff3 = Buffer::from_slice(&mut mat3, Extent::d2(SIDE, SIDE))?;
        let range = NdRange::new(Extent::d2(SIDE, SIDE), Extent::d2(LSIZE, LSIZE))?;

        let mut task = Task::new(range);
        let acc1 = task.bind_read(&buff1)?;
        let acc2 = task.bind_read(&buff2)?;
        let acc3 = task.bind_write(&mut buff3)?;
        let lm = task.local_staging::<i32>(1)?;

        task.stage(move |item, ctx| {
            lm.set(ctx, item.local_linear(), 0, 0);
        });
        for ij in 0..SIDE {
            task.stage(move |item, ctx| {
                let sum = lm.get(ctx, item.local_linear(), 0);
                let partial = acc1.get2(ctx, item.global_id(0), ij) * acc2.get2(ctx, ij, item.global_id(1));
                lm.set(ctx, item.local_linear(), 0, sum + partial);
            });
        }
        task.stage(move |item, ctx| {
            let sum = lm.get(ctx, item.local_linear(), 0);
            acc3.set2(ctx, item.global_id(0), item.global_id(1), sum);
        });

        queue.submit(task)?;
    }

    print_grid(&mat1, SIDE as usize);
    println!("x");
    print_grid(&mat2, SIDE as usize);
    println!("=");
    print_grid(&mat3, SIDE as usize);
    Ok(())
}
