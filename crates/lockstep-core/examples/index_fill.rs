//! Write each item's global index into a device buffer and read it back on
//! the host.
//!
//! The smallest possible lifecycle demo: one write-only binding, one stage,
//! host readback after the submission's synchronization point.

use lockstep_core::{Buffer, NdRange, Queue, Task, WriteAccess};
use lockstep_util::{print_all, printe};

fn main() -> lockstep_core::Result<()> {
    lockstep_tracing::init_default();

    let queue = match Queue::new() {
        Ok(queue) => queue,
        Err(err) => {
            printe(format!("device selection failed: {err}"));
            std::process::exit(1);
        }
    };

    let mut data = vec![0u16; 64];
    {
        let mut buffer = Buffer::linear(&mut data)?;
        let mut task = Task::new(NdRange::linear(64, 8)?);
        let out = task.bind_write(&mut buffer)?;
        task.stage(move |item, ctx| {
            out.set(ctx, item.global_linear(), item.global_linear() as u16);
        });
        queue.submit(task)?;
    }

    print_all(&data);
    Ok(())
}
