use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Every stored key must be disjoint from every other.
fn validate_grid<V>(g: &SparseGrid<Region, V>)
where
    V: Clone,
{
    let keys = g.keys();
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert!(!a.intersects(b), "stored regions {a} and {b} intersect");
        }
    }
    assert_eq!(keys.len(), g.len(), "key snapshot must match len");
}

fn brute_force<V: Clone>(g: &SparseGrid<Region, V>, query: &Region, condition: Condition) -> Vec<Region> {
    g.keys()
        .into_iter()
        .filter(|k| condition.matches(query, k))
        .collect()
}

/// Small coordinates so that regions collide often. Widths of zero produce
/// empty regions, which must never intersect anything.
fn region_strategy() -> impl Strategy<Value = Region> + Clone {
    (-12i64..12, 0i64..6, -12i64..12, 0i64..6)
        .prop_map(|(x, w, y, h)| Region::spanning(x, x + w, y, y + h).unwrap())
}

fn nonempty_region_strategy() -> impl Strategy<Value = Region> + Clone {
    (-12i64..12, 1i64..6, -12i64..12, 1i64..6)
        .prop_map(|(x, w, y, h)| Region::spanning(x, x + w, y, y + h).unwrap())
}

fn condition_strategy() -> impl Strategy<Value = Condition> + Clone {
    prop::sample::select(Condition::ALL.to_vec())
}

#[derive(Clone, Debug)]
enum Op {
    Put(Region, u32),
    Remove(Region),
    Search(Region, Condition),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let region = region_strategy();
    let op = prop_oneof![
        50 => (region.clone(), any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
        15 => region.clone().prop_map(Op::Remove),
        35 => (region.clone(), condition_strategy()).prop_map(|(k, c)| Op::Search(k, c)),
    ];
    prop::collection::vec(op, 0..=300)
}

#[derive(Clone, Debug)]
enum StoreOp {
    Put(u16, u64),
    Remove(u16),
    Get(u16),
}

fn store_ops_strategy() -> impl Strategy<Value = Vec<StoreOp>> {
    let key = 0u16..64;
    let op = prop_oneof![
        50 => (key.clone(), any::<u64>()).prop_map(|(k, v)| StoreOp::Put(k, v)),
        25 => key.clone().prop_map(StoreOp::Remove),
        25 => key.prop_map(StoreOp::Get),
    ];
    prop::collection::vec(op, 0..=500)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_grid_matches_brute_force(ops in ops_strategy()) {
        let g: SparseGrid<Region, u32> = SparseGrid::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    let expected = brute_force(&g, &key, Condition::Intersects);
                    let prior = g.get(&key);
                    let evicted: Vec<Region> = g.put(key, value).into_iter().map(|(k, _)| k).collect();
                    if key.is_empty() {
                        // Empty keys intersect nothing; only an exact overwrite is reported.
                        prop_assert_eq!(evicted.len(), usize::from(prior.is_some()));
                    } else {
                        prop_assert_eq!(evicted, expected);
                    }
                    prop_assert_eq!(g.get(&key), Some(value));
                }
                Op::Remove(key) => {
                    let expected = brute_force(&g, &key, Condition::Intersects);
                    let removed: Vec<Region> = g.remove(&key, &[]).into_iter().map(|(k, _)| k).collect();
                    prop_assert_eq!(removed, expected);
                }
                Op::Search(key, condition) => {
                    prop_assert_eq!(g.search(&key, condition), brute_force(&g, &key, condition));
                }
            }
        }

        prop_assert!(!g.may_overlap());
        validate_grid(&g);
    }

    #[test]
    fn prop_every_condition_on_a_full_grid(
        keys in prop::collection::vec(nonempty_region_strategy(), 0..=120),
        query in region_strategy(),
    ) {
        let g: SparseGrid<Region, ()> = keys.into_iter().map(|k| (k, ())).collect();
        validate_grid(&g);

        for condition in Condition::ALL {
            prop_assert_eq!(g.search(&query, condition), brute_force(&g, &query, condition));
        }
        prop_assert!(g.get_contains(&query).len() <= 1 || query.is_empty());

        let mut by_axes: Vec<Region> = g
            .get_x_intercepting(&query)
            .into_iter()
            .filter(|k| g.get_y_intercepting(&query).contains(k))
            .collect();
        by_axes.sort();
        prop_assert_eq!(g.get_intersecting(&query), by_axes);
    }

    #[test]
    fn prop_relations_are_antisymmetric(a in nonempty_region_strategy(), b in nonempty_region_strategy()) {
        let ab = a.relative_to(&b);
        let ba = b.relative_to(&a);
        prop_assert_eq!(ab.ordinal(), -ba.ordinal());
        prop_assert_eq!(ab == Relation::Intersects, a.intersects(&b));
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        prop_assert_eq!(a.contains(&b), b.within(&a));
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
        if let Some(overlap) = a.intersection(&b) {
            prop_assert!(a.contains(&overlap) && b.contains(&overlap));
        }
    }

    #[test]
    fn prop_parse_display(a in region_strategy(), c in condition_strategy()) {
        prop_assert_eq!(a.to_string().parse::<Region>(), Ok(a));
        prop_assert_eq!(c.to_string().parse::<Condition>(), Ok(c));
        prop_assert_eq!(c.as_str().to_uppercase().replace('_', "-").parse::<Condition>(), Ok(c));
    }

    #[test]
    fn prop_store_equivalence(ops in store_ops_strategy()) {
        let s: SparseStore<u16, u64> = SparseStore::new();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in ops {
            match op {
                StoreOp::Put(key, value) => prop_assert_eq!(s.put(key, value), m.insert(key, value)),
                StoreOp::Remove(key) => prop_assert_eq!(s.remove(&key), m.remove(&key)),
                StoreOp::Get(key) => prop_assert_eq!(s.get(&key), m.get(&key).copied()),
            }
            prop_assert_eq!(s.len(), m.len());
        }

        prop_assert_eq!(s.to_map(), m.clone());
        if let Some((&probe, _)) = m.iter().nth(m.len() / 2) {
            let lower: Vec<u16> = m.range(..=probe).rev().map(|(k, _)| *k).collect();
            prop_assert_eq!(s.lower(&probe, true), lower);
            let higher: Vec<u16> = m.range(probe..).skip(1).map(|(k, _)| *k).collect();
            prop_assert_eq!(s.higher(&probe, false), higher);
        }
    }
}

#[test]
fn exhaustive_put_order_small_board() {
    // Every insertion order of a few overlapping regions leaves the grid
    // holding exactly the survivors a naive replay predicts.
    let regions: Vec<Region> = ["0:2|0:2", "1:3|1:3", "2:4|0:1", "0:1|2:4", "3:5|3:5"]
        .iter()
        .map(|s| Region::of(s).unwrap())
        .collect();

    for_each_permutation(&regions, |perm| {
        let g: SparseGrid<Region, usize> = SparseGrid::new();
        let mut model: Vec<Region> = Vec::new();

        for (i, r) in perm.into_iter().enumerate() {
            model.retain(|kept| !kept.intersects(&r));
            model.push(r);
            g.put(r, i);
            validate_grid(&g);
        }

        model.sort();
        assert_eq!(g.keys(), model);
    });
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}
