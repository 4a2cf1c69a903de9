use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;

use chain_hash::HashTable as ChainHashTable;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

trait BenchItem: Clone {
    fn new(key: u64) -> Self;

    fn hash_key(&self) -> u64;
    fn eq_key(&self, other: &Self) -> bool;
}

#[derive(Clone)]
struct SmallTestItem {
    key: u64,
}

impl BenchItem for SmallTestItem {
    fn new(key: u64) -> Self {
        black_box(Self { key })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone)]
struct TestItem {
    key: String,
}

impl BenchItem for TestItem {
    fn new(key: u64) -> Self {
        black_box(Self {
            key: format!("key_{:016X}", key),
        })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

fn hashed_items<Item: BenchItem>(keys: impl Iterator<Item = u64>) -> Vec<(u64, Item)> {
    keys.map(|key| {
        let item = Item::new(key);
        (item.hash_key(), item)
    })
    .collect()
}

fn bench_insert_random<Item: BenchItem, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<Item>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = OsRng;

    for &size in SIZES[..=MAX_SIZE].iter() {
        let hash_and_item: Vec<(u64, Item)> =
            hashed_items((0..size).map(|_| rng.try_next_u64().unwrap()));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = ChainHashTable::<Item>::new();
                    for (hash, item) in hash_and_item {
                        table.insert(hash, item);
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut hash_and_item = hash_and_item.clone();
                    hash_and_item.shuffle(&mut SmallRng::from_os_rng());
                    hash_and_item
                },
                |hash_and_item| {
                    let mut table = HashbrownHashTable::with_capacity(0);
                    for (hash, item) in hash_and_item {
                        black_box(table.insert_unique(hash, item, |v: &Item| v.hash_key()));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<Item: BenchItem, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "find_hit_miss_{}",
        core::any::type_name::<Item>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let hits: Vec<(u64, Item)> = hashed_items((0..size as u64 * 2).step_by(2));
        let misses: Vec<(u64, Item)> = hashed_items((1..=size as u64 * 2).step_by(2));

        let mut probes = hits.clone();
        probes.extend(misses.iter().cloned());

        let mut chain_table = ChainHashTable::<Item>::new();
        let mut hashbrown_table = HashbrownHashTable::<Item>::with_capacity(0);
        for (hash, item) in hits.iter().cloned() {
            chain_table.insert(hash, item.clone());
            hashbrown_table.insert_unique(hash, item, |v| v.hash_key());
        }

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut probes = probes.clone();
                    probes.shuffle(&mut SmallRng::from_os_rng());
                    probes
                },
                |probes| {
                    for (hash, key) in probes.iter() {
                        black_box(chain_table.find(*hash, |v| v.eq_key(key)));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut probes = probes.clone();
                    probes.shuffle(&mut SmallRng::from_os_rng());
                    probes
                },
                |probes| {
                    for (hash, key) in probes.iter() {
                        black_box(hashbrown_table.find(*hash, |v| v.eq_key(key)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_zipf<Item: BenchItem, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_zipf_{}", core::any::type_name::<Item>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let items: Vec<(u64, Item)> = hashed_items(0..size as u64);
        let zipf = Zipf::new(size as f64, 1.03).unwrap();

        let mut chain_table = ChainHashTable::<Item>::new();
        let mut hashbrown_table = HashbrownHashTable::<Item>::with_capacity(0);
        for (hash, item) in items.iter().cloned() {
            chain_table.insert(hash, item.clone());
            hashbrown_table.insert_unique(hash, item, |v| v.hash_key());
        }

        let sample = |rng: &mut SmallRng| -> Vec<(u64, Item)> {
            (0..size)
                .map(|_| items[rng.sample(&zipf) as usize - 1].clone())
                .collect()
        };

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || sample(&mut SmallRng::from_os_rng()),
                |probes| {
                    for (hash, key) in probes.iter() {
                        black_box(chain_table.find(*hash, |v| v.eq_key(key)));
                    }
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || sample(&mut SmallRng::from_os_rng()),
                |probes| {
                    for (hash, key) in probes.iter() {
                        black_box(hashbrown_table.find(*hash, |v| v.eq_key(key)));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_resize<Item: BenchItem, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("resize_{}", core::any::type_name::<Item>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES[..=MAX_SIZE].iter() {
        let mut table = ChainHashTable::<Item>::new();
        for (hash, item) in hashed_items::<Item>(0..size as u64) {
            table.insert(hash, item);
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || table.clone(),
                |mut table| {
                    table.resize();
                    black_box(table)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<SmallTestItem, 4>,
    bench_insert_random::<TestItem, 4>,
    bench_find_hit_miss::<SmallTestItem, 4>,
    bench_find_hit_miss::<TestItem, 4>,
    bench_find_zipf::<SmallTestItem, 4>,
    bench_find_zipf::<TestItem, 4>,
    bench_resize::<SmallTestItem, 4>,
    bench_resize::<TestItem, 4>,
);

criterion_main!(benches);
