//! Using `SequencePool` to reuse vector storage across iterations of a processing loop.

use ring_pool::SequencePool;

fn main() {
    let mut pool = SequencePool::<u64>::new();

    // Allocate the vectors up front so the loop below starts warm.
    pool.seed(4);
    println!("Seeded pool stores {} vectors", pool.len());

    for batch in 0..8_u64 {
        let mut values = pool.create();

        // The vector is always empty when it comes out of the pool, but after the first few
        // batches it already has room for everything we push into it.
        let capacity_before = values.capacity();
        values.extend((0..1000).map(|i| i * batch));
        let sum: u64 = values.iter().sum();

        println!(
            "Batch {batch}: sum {sum}, capacity before {capacity_before}, after {}",
            values.capacity()
        );

        pool.release(values);
    }
}
