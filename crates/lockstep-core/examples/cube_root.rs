//! Cube root of a vector in place through a read-write binding.
//!
//! No local memory: a single stage rewrites each element at its global
//! index. The selection chain is handled explicitly; when every policy
//! fails the sample aborts with a printed diagnostic and a non-zero exit.

use lockstep_core::{Buffer, DeviceKind, NdRange, Queue, ReadAccess, Task, WriteAccess};
use lockstep_util::{iota, print_all, printe};

fn main() -> lockstep_core::Result<()> {
    lockstep_tracing::init_default();

    let queue = match Queue::with_policies(&[DeviceKind::Gpu, DeviceKind::Cpu]) {
        Ok(queue) => queue,
        Err(err) => {
            printe(format!("device selection failed: {err}"));
            std::process::exit(1);
        }
    };

    let mut vector = vec![0.0f32; 8];
    iota(&mut vector, 1.0);

    let lsize = if vector.len() % 2 == 0 { 2 } else { 1 };
    {
        let mut buff = Buffer::linear(&mut vector)?;
        let mut task = Task::new(NdRange::linear(buff.len() as u32, lsize)?);
        let acc = task.bind_read_write(&mut buff)?;
        task.stage(move |item, ctx| {
            let gid = item.global_linear();
            acc.set(ctx, gid, acc.get(ctx, gid).cbrt());
        });
        queue.submit(task)?;
    }

    print_all(&vector);
    Ok(())
}
