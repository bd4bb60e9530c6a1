//! Integration tests for the load/map/store staged pattern.
//!
//! These run whole units of work through the queue and verify the staged
//! pipeline semantics: identity idempotence, pure-function maps, multi-slot
//! staging, and the structural barrier guarantees of the stage-table
//! representation.

use lockstep_core::{staged, Buffer, Extent, NdRange, Queue, Task};

fn queue() -> Queue {
    Queue::new().expect("CPU fallback must be available")
}

#[test]
fn identity_pipeline_reproduces_the_input() -> lockstep_core::Result<()> {
    let queue = queue();

    let mut data: Vec<f32> = (0..64).map(|i| i as f32 * 0.5 - 7.0).collect();
    let expected = data.clone();

    {
        let mut buffer = Buffer::from_slice(&mut data, Extent::d2(8, 8))?;
        let range = NdRange::new(Extent::d2(8, 8), Extent::d2(2, 2))?;
        let mut task = Task::new(range);
        let acc = task.bind_read_write(&mut buffer)?;
        let lm = task.local_staging::<f32>(1)?;
        staged::load(&mut task, acc, lm, 0);
        staged::store(&mut task, lm, 0, acc);
        queue.submit(task)?;
    }

    assert_eq!(data, expected);
    Ok(())
}

#[test]
fn sqrt_pipeline_inverts_squares_within_tolerance() -> lockstep_core::Result<()> {
    let queue = queue();

    // [1, 4, 9, 16, ...] -> [1, 2, 3, 4, ...]
    let mut data: Vec<f32> = (1..=64).map(|i| (i * i) as f32).collect();

    {
        let mut buffer = Buffer::from_slice(&mut data, Extent::d2(8, 8))?;
        let range = NdRange::new(Extent::d2(8, 8), Extent::d2(2, 2))?;
        let mut task = Task::new(range);
        let acc = task.bind_read_write(&mut buffer)?;
        let lm = task.local_staging::<f32>(1)?;
        staged::unary(&mut task, acc, lm, |x| x.sqrt());
        queue.submit(task)?;
    }

    for (i, value) in data.iter().enumerate() {
        let expected = (i + 1) as f32;
        assert!(
            (value - expected).abs() < 1e-5,
            "sqrt at {i}: got {value}, expected {expected}"
        );
    }
    Ok(())
}

#[test]
fn square_pipeline_is_exact_for_integers() -> lockstep_core::Result<()> {
    let queue = queue();

    let n = 64u32;
    let mut data: Vec<[u32; 4]> = vec![[0; 4]; n as usize / 4];
    lockstep_util::iota_lanes(&mut data, 1);

    {
        let mut buffer = Buffer::from_slice(&mut data, Extent::d2(4, 4))?;
        let range = NdRange::new(Extent::d2(4, 4), Extent::d2(2, 2))?;
        let mut task = Task::new(range);
        let acc = task.bind_read_write(&mut buffer)?;
        let lm = task.local_staging::<[u32; 4]>(1)?;
        staged::unary(&mut task, acc, lm, |v: [u32; 4]| v.map(|lane| lane * lane));
        queue.submit(task)?;
    }

    let flat: &[u32] = bytemuck::cast_slice(&data);
    for (i, &value) in flat.iter().enumerate() {
        let x = (i + 1) as u32;
        assert_eq!(value, x * x);
    }
    Ok(())
}

#[test]
fn second_slot_staging_keeps_source_and_result_apart() -> lockstep_core::Result<()> {
    let queue = queue();

    let mut src = vec![0.0f32; 96];
    lockstep_util::iota(&mut src, 1.0);
    let mut dst = vec![0.0f32; src.len()];

    {
        let src_buff = Buffer::from_slice(&mut src, Extent::d3(4, 4, 6))?;
        let mut dst_buff = Buffer::from_slice(&mut dst, Extent::d3(4, 4, 6))?;
        let range = NdRange::new(Extent::d3(4, 4, 6), Extent::d3(2, 2, 2))?;
        let mut task = Task::new(range);
        let src_acc = task.bind_read(&src_buff)?;
        let dst_acc = task.bind_write(&mut dst_buff)?;
        let lm = task.local_staging::<f32>(2)?;
        staged::load(&mut task, src_acc, lm, 0);
        staged::map(&mut task, lm, 0, 1, |x| x.sqrt());
        staged::store(&mut task, lm, 1, dst_acc);
        queue.submit(task)?;
    }

    // Source untouched, destination holds the roots.
    for (i, (&s, &d)) in src.iter().zip(dst.iter()).enumerate() {
        assert_eq!(s, (i + 1) as f32);
        assert!((d - s.sqrt()).abs() < 1e-5, "sqrt at {i}");
    }
    Ok(())
}

#[test]
fn sine_pipeline_matches_the_host_function() -> lockstep_core::Result<()> {
    let queue = queue();

    let pi = std::f32::consts::PI;
    let mut data: Vec<f32> = (0..36).map(|i| -pi + i as f32 * pi / 20.0).collect();
    let inputs = data.clone();

    {
        let mut buffer = Buffer::from_slice(&mut data, Extent::d2(6, 6))?;
        let range = NdRange::new(Extent::d2(6, 6), Extent::d2(3, 3))?;
        let mut task = Task::new(range);
        let acc = task.bind_read_write(&mut buffer)?;
        let lm = task.local_staging::<f32>(2)?;
        staged::load(&mut task, acc, lm, 0);
        staged::map(&mut task, lm, 0, 1, |x| x.sin());
        staged::store(&mut task, lm, 1, acc);
        queue.submit(task)?;
    }

    for (i, (&out, &input)) in data.iter().zip(inputs.iter()).enumerate() {
        assert!((out - input.sin()).abs() < 1e-5, "sin at {i}");
    }
    Ok(())
}

// ================================================================================================
// Structural barrier checks
// ================================================================================================

fn unary_stage_count(data_len: usize) -> usize {
    // The plan shape must not depend on the data the task will run over.
    let range = NdRange::linear(data_len as u32, 2).unwrap();
    let mut task = Task::new(range);
    let lm = task.local_staging::<f32>(1).unwrap();
    staged::map(&mut task, lm, 0, 0, |x: f32| x + 1.0);
    staged::map(&mut task, lm, 0, 0, |x: f32| x * 2.0);
    task.stage_count()
}

#[test]
fn stage_counts_are_data_independent() {
    assert_eq!(unary_stage_count(8), unary_stage_count(4096));
}

#[test]
fn unary_pipeline_has_two_barriers() {
    let mut data = vec![0.0f32; 8];
    let mut buffer = Buffer::linear(&mut data).unwrap();
    let range = NdRange::linear(8, 2).unwrap();
    let mut task = Task::new(range);
    let lm = task.local_staging::<f32>(1).unwrap();
    let acc = task.bind_read_write(&mut buffer).unwrap();
    staged::unary(&mut task, acc, lm, |x| x);
    // load | map | store: two boundaries, two barriers.
    assert_eq!(task.stage_count(), 3);
    assert_eq!(task.barrier_count(), 2);
}

#[test]
fn reduction_pipeline_barrier_count_tracks_the_side() {
    // The matrix-multiply arrangement: zero + one accumulate per reduction
    // step + store. Barrier count is `side + 1` whatever the matrix holds.
    for side in [2u32, 4, 8] {
        let range = NdRange::new(Extent::d2(side, side), Extent::d2(2, 2)).unwrap();
        let mut task = Task::new(range);
        let lm = task.local_staging::<i32>(1).unwrap();
        task.stage(move |item, ctx| lm.set(ctx, item.local_linear(), 0, 0));
        for _ in 0..side {
            task.stage(move |item, ctx| {
                let sum = lm.get(ctx, item.local_linear(), 0);
                lm.set(ctx, item.local_linear(), 0, sum);
            });
        }
        task.stage(move |item, ctx| {
            let _ = lm.get(ctx, item.local_linear(), 0);
        });
        assert_eq!(task.stage_count() as u32, side + 2);
        assert_eq!(task.barrier_count() as u32, side + 1);
    }
}
