use core::hash::BuildHasher;
use core::hash::Hasher;
use core::hint::black_box;

use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use siphasher::sip::SipHasher;
use treebin::HashMap as TreebinMap;

#[derive(Clone)]
struct SipBuilder {
    k1: u64,
    k2: u64,
}

impl BuildHasher for SipBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.k1, self.k2)
    }
}

/// Truncates a SipHash result to a handful of distinct values, so every map
/// under test faces the same heavily colliding key distribution.
struct CollapsingHasher(SipHasher);

impl Hasher for CollapsingHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.write(bytes);
    }

    fn finish(&self) -> u64 {
        self.0.finish() & 0x7
    }
}

#[derive(Clone)]
struct CollapsingBuilder {
    inner: SipBuilder,
}

impl BuildHasher for CollapsingBuilder {
    type Hasher = CollapsingHasher;

    fn build_hasher(&self) -> Self::Hasher {
        CollapsingHasher(self.inner.build_hasher())
    }
}

fn keys(count: usize) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    (0..count).map(|_| rng.random::<u64>()).collect()
}

fn bench_uniform(c: &mut Criterion) {
    const N: usize = 10_000;
    let keys = keys(N);
    let builder = SipBuilder { k1: 1, k2: 2 };

    let mut group = c.benchmark_group("uniform");
    group.throughput(Throughput::Elements(N as u64));

    group.bench_function("insert/treebin", |b| {
        b.iter(|| {
            let mut map = TreebinMap::with_hasher(builder.clone());
            for &k in &keys {
                map.insert(black_box(k), k);
            }
            black_box(map.len())
        })
    });
    group.bench_function("insert/hashbrown", |b| {
        b.iter(|| {
            let mut map = hashbrown::HashMap::with_hasher(builder.clone());
            for &k in &keys {
                map.insert(black_box(k), k);
            }
            black_box(map.len())
        })
    });
    group.bench_function("insert/std", |b| {
        b.iter(|| {
            let mut map = std::collections::HashMap::with_hasher(builder.clone());
            for &k in &keys {
                map.insert(black_box(k), k);
            }
            black_box(map.len())
        })
    });

    let mut treebin = TreebinMap::with_hasher(builder.clone());
    let mut brown = hashbrown::HashMap::with_hasher(builder.clone());
    for &k in &keys {
        treebin.insert(k, k);
        brown.insert(k, k);
    }
    group.bench_function("lookup/treebin", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &k in &keys {
                if treebin.get(black_box(&k)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
    group.bench_function("lookup/hashbrown", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &k in &keys {
                if brown.get(black_box(&k)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
    group.finish();
}

fn bench_colliding(c: &mut Criterion) {
    const N: usize = 1_000;
    let keys = keys(N);
    let builder = CollapsingBuilder {
        inner: SipBuilder { k1: 3, k2: 4 },
    };

    let mut group = c.benchmark_group("colliding");
    group.throughput(Throughput::Elements(N as u64));

    // Eight distinct hash values for a thousand keys: treebin serves these
    // from balanced trees, chaining or probing degrades linearly.
    group.bench_function("insert_lookup/treebin", |b| {
        b.iter(|| {
            let mut map = TreebinMap::with_hasher(builder.clone());
            for &k in &keys {
                map.insert(k, k);
            }
            let mut hits = 0usize;
            for &k in &keys {
                if map.get(black_box(&k)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
    group.bench_function("insert_lookup/hashbrown", |b| {
        b.iter(|| {
            let mut map = hashbrown::HashMap::with_hasher(builder.clone());
            for &k in &keys {
                map.insert(k, k);
            }
            let mut hits = 0usize;
            for &k in &keys {
                if map.get(black_box(&k)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_uniform, bench_colliding);
criterion_main!(benches);
