use core::hash::BuildHasherDefault;
use core::hash::Hash;
use core::hint::black_box;

use chain_hash::Argument;
use chain_hash::HashMap as ChainHashMap;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

type SipState = BuildHasherDefault<SipHasher>;

trait BenchKey: Clone + Hash + Eq + Argument {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl BenchKey for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{:016X}", key))
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

fn random_keys<K: BenchKey>(count: usize) -> Vec<K> {
    let mut rng = SmallRng::from_os_rng();
    (0..count).map(|_| K::new(rng.random())).collect()
}

fn chain_map<K: BenchKey>(keys: &[K]) -> ChainHashMap<K, u64, SipState> {
    let mut map = ChainHashMap::with_hasher(SipState::default());
    for (i, key) in keys.iter().enumerate() {
        map.put(key.clone(), i as u64).unwrap();
    }
    map
}

fn hashbrown_map<K: BenchKey>(keys: &[K]) -> HashbrownHashMap<K, u64, SipState> {
    let mut map = HashbrownHashMap::with_hasher(SipState::default());
    for (i, key) in keys.iter().enumerate() {
        map.insert(key.clone(), i as u64);
    }
    map
}

fn std_map<K: BenchKey>(keys: &[K]) -> std::collections::HashMap<K, u64, SipState> {
    let mut map = std::collections::HashMap::with_hasher(SipState::default());
    for (i, key) in keys.iter().enumerate() {
        map.insert(key.clone(), i as u64);
    }
    map
}

fn bench_insert_random<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| black_box(chain_map(&keys)),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| black_box(hashbrown_map(&keys)),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("std/{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| black_box(std_map(&keys)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        let mut lookups = keys.clone();
        lookups.shuffle(&mut SmallRng::from_os_rng());
        group.throughput(Throughput::Elements(size as u64));

        let chain = chain_map(&keys);
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                for key in &lookups {
                    black_box(chain.get(key).unwrap());
                }
            })
        });

        let hashbrown = hashbrown_map(&keys);
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &lookups {
                    black_box(hashbrown.get(key));
                }
            })
        });

        let std = std_map(&keys);
        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                for key in &lookups {
                    black_box(std.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_find_miss<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_miss_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        let misses = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        let chain = chain_map(&keys);
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(chain.get(key).unwrap());
                }
            })
        });

        let hashbrown = hashbrown_map(&keys);
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for key in &misses {
                    black_box(hashbrown.get(key));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        let mut order = keys.clone();
        order.shuffle(&mut SmallRng::from_os_rng());
        group.throughput(Throughput::Elements(size as u64));

        let chain = chain_map(&keys);
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || chain.clone(),
                |mut map| {
                    for key in &order {
                        black_box(map.remove(key).unwrap());
                    }
                    map
                },
                BatchSize::SmallInput,
            )
        });

        let hashbrown = hashbrown_map(&keys);
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown.clone(),
                |mut map| {
                    for key in &order {
                        black_box(map.remove(key));
                    }
                    map
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_iteration<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("iteration_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size);
        group.throughput(Throughput::Elements(size as u64));

        let chain = chain_map(&keys);
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| black_box(chain.values().sum::<u64>()))
        });

        let hashbrown = hashbrown_map(&keys);
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| black_box(hashbrown.values().sum::<u64>()))
        });
    }

    group.finish();
}

/// Zipf-distributed mix of 70% lookups, 20% inserts and 10% removals over a
/// key space twice the map size.
fn bench_mixed_probabilistic_zipf<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "mixed_probabilistic_zipf_{}",
        core::any::type_name::<K>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let universe = (0..size as u64 * 2).map(K::new).collect::<Vec<_>>();
        let zipf = Zipf::new(universe.len() as f64, 1.1).unwrap();
        let mut rng = SmallRng::from_os_rng();
        let ops = (0..size)
            .map(|_| {
                let key = rng.sample(zipf) as usize - 1;
                (rng.random_range(0..10u8), key)
            })
            .collect::<Vec<_>>();
        group.throughput(Throughput::Elements(size as u64));

        let chain = chain_map(&universe[..size]);
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || chain.clone(),
                |mut map| {
                    for &(op, key) in &ops {
                        let key = &universe[key];
                        match op {
                            0..7 => {
                                black_box(map.get(key).unwrap());
                            }
                            7..9 => {
                                map.put(key.clone(), op as u64).unwrap();
                            }
                            _ => {
                                black_box(map.remove(key).unwrap());
                            }
                        }
                    }
                    map
                },
                BatchSize::SmallInput,
            )
        });

        let hashbrown = hashbrown_map(&universe[..size]);
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown.clone(),
                |mut map| {
                    for &(op, key) in &ops {
                        let key = &universe[key];
                        match op {
                            0..7 => {
                                black_box(map.get(key));
                            }
                            7..9 => {
                                map.insert(key.clone(), op as u64);
                            }
                            _ => {
                                black_box(map.remove(key));
                            }
                        }
                    }
                    map
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_churn<K: BenchKey>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("churn_{}", core::any::type_name::<K>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let keys = random_keys::<K>(size * 2);
        group.throughput(Throughput::Elements(size as u64));

        let chain = chain_map(&keys[..size]);
        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || chain.clone(),
                |mut map| {
                    for (old, new) in keys[..size].iter().zip(&keys[size..]) {
                        map.remove(old).unwrap();
                        map.put(new.clone(), 0).unwrap();
                    }
                    map
                },
                BatchSize::SmallInput,
            )
        });

        let hashbrown = hashbrown_map(&keys[..size]);
        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown.clone(),
                |mut map| {
                    for (old, new) in keys[..size].iter().zip(&keys[size..]) {
                        map.remove(old);
                        map.insert(new.clone(), 0);
                    }
                    map
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<u64>,
    bench_insert_random::<String>,
    bench_find_hit::<u64>,
    bench_find_hit::<String>,
    bench_find_miss::<u64>,
    bench_find_miss::<String>,
    bench_remove::<u64>,
    bench_remove::<String>,
    bench_iteration::<u64>,
    bench_mixed_probabilistic_zipf::<u64>,
    bench_mixed_probabilistic_zipf::<String>,
    bench_churn::<u64>,
    bench_churn::<String>,
);
criterion_main!(benches);
