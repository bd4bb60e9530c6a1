//! Square root of an 8x8 matrix, staged through local memory.
//!
//! The canonical three-phase pattern: copy to the group's staging slot,
//! compute on staging, copy back - with the group barrier at each phase
//! boundary. Also prints the device's local memory size, the one device
//! property the samples query.

use lockstep_core::{staged, Buffer, Extent, NdRange, Queue, Task};
use lockstep_util::{iota, print_grid};

const GSIZE: u32 = 8; // global range is 8x8
const LSIZE: u32 = 2; // local range is 2x2

fn main() -> lockstep_core::Result<()> {
    lockstep_tracing::init_default();

    let queue = Queue::new()?;
    println!("max local memory size: {}", queue.local_mem_size());

    let mut vector = vec![0.0f32; (GSIZE * GSIZE) as usize];
    iota(&mut vector, 1.0);

    println!("vector:");
    print_grid(&vector, GSIZE as usize);

    {
        let mut buffer = Buffer::from_slice(&mut vector, Extent::d2(GSIZE, GSIZE))?;
        let range = NdRange::new(Extent::d2(GSIZE, GSIZE), Extent::d2(LSIZE, LSIZE))?;

        let mut task = Task::new(range);
        let acc = task.bind_read_write(&mut buffer)?;
        let lm = task.local_staging::<f32>(1)?;
        staged::unary(&mut task, acc, lm, |x| x.sqrt());
        queue.submit(task)?;
    }

    println!("after sqrt:");
    print_grid(&vector, GSIZE as usize);
    Ok(())
}
