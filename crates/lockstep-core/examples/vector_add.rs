//! Elementwise vector addition over a 1D nd-range of 9 items in groups
//! of 3.
//!
//! Two read-only inputs, one write-only result, a single stage with no
//! local memory.

use lockstep_core::{Buffer, Extent, NdRange, Queue, ReadAccess, Task, WriteAccess};
use lockstep_util::{iota, print_all};

const GSIZE: u32 = 9;
const LSIZE: u32 = 3;

fn main() -> lockstep_core::Result<()> {
    lockstep_tracing::init_default();

    let queue = Queue::new()?;

    let mut add1 = vec![0i32; GSIZE as usize];
    let mut add2 = vec![0i32; GSIZE as usize];
    let mut result = vec![0i32; GSIZE as usize];
    iota(&mut add1, 1);
    iota(&mut add2, 37);

    {
        let buff1 = Buffer::from_slice(&mut add1, Extent::d1(GSIZE))?;
        let buff2 = Buffer::from_slice(&mut add2, Extent::d1(GSIZE))?;
        let mut buff3 = Buffer::from_slice(&mut result, Extent::d1(GSIZE))?;

        let mut task = Task::new(NdRange::linear(GSIZE, LSIZE)?);
        let acc1 = task.bind_read(&buff1)?;
        let acc2 = task.bind_read(&buff2)?;
        let acc3 = task.bind_write(&mut buff3)?;
        task.stage(move |item, ctx| {
            let gid = item.global_linear();
            acc3.set(ctx, gid, acc1.get(ctx, gid) + acc2.get(ctx, gid));
        });
        queue.submit(task)?;
    }

    print_all(&add1);
    print_all(&add2);
    print_all(&result);
    Ok(())
}
