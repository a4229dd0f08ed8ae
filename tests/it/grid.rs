use std::collections::BTreeMap;

use sparse_grid::{Condition, Config, Error, Region, Relation, SparseGrid, Walk};

use crate::helpers::{assert_disjoint, region, regions};

/// A 4-column sheet with two merged header cells and a merged footer.
fn sheet() -> SparseGrid<Region, &'static str> {
    let grid = SparseGrid::new();
    grid.put(region("0:2|0"), "title");
    grid.put(region("2:4|0"), "summary");
    for x in 0..4 {
        for y in 1..4 {
            grid.put(Region::at(x, y).unwrap(), "cell");
        }
    }
    grid.put(region("0:4|4"), "footer");
    grid
}

#[test]
fn test_merge_cells_evicts_covered_cells() {
    let grid = sheet();
    assert_eq!(grid.len(), 15);

    let evicted = grid.put(region("1:3|1:3"), "merged");
    assert_eq!(
        evicted.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        regions(&["1|1", "1|2", "2|1", "2|2"])
    );
    assert_eq!(grid.len(), 12);
    assert_eq!(grid.get_contains(&region("2|2")), regions(&["1:3|1:3"]));
    assert_disjoint(&grid);
}

#[test]
fn test_unmerge_by_put_all() {
    let grid = sheet();
    let cells: Vec<(Region, &str)> = (0..4).map(|x| (Region::at(x, 4).unwrap(), "split")).collect();
    let evicted = grid.put_all(cells, &[]);
    assert_eq!(evicted, vec![(region("0:4|4"), "footer")]);
    assert_eq!(grid.get_y_intercepting(&region("-100:100|4")).len(), 4);
    assert_disjoint(&grid);
}

#[test]
fn test_column_and_row_queries() {
    let grid = sheet();
    assert_eq!(
        grid.get_x_intercepting(&region("3|-1")),
        regions(&["0:4|4", "2:4|0", "3|1", "3|2", "3|3"])
    );
    assert_eq!(grid.get_y_intercepting(&region("99|0")), regions(&["0:2|0", "2:4|0"]));
    assert_eq!(grid.get_within(&region("0:4|0:1")), regions(&["0:2|0", "2:4|0"]));
}

#[test]
fn test_lookup_with_parsed_conditions() {
    let grid = sheet();
    let conditions: Vec<Condition> = ["intersects", "Within"]
        .iter()
        .map(|name| name.parse().unwrap())
        .collect();
    let found = grid.get_all(&region("1:3|0"), &conditions);
    assert_eq!(found, vec![(region("0:2|0"), "title"), (region("2:4|0"), "summary")]);

    assert_eq!(
        "overlaps".parse::<Condition>(),
        Err(Error::UnknownCondition("overlaps".to_string()))
    );
}

#[test]
fn test_grid_exposes_map_reads() {
    let grid = sheet();
    assert_eq!(grid.lowest(), Some(region("0|1")));
    assert_eq!(grid.highest(), Some(region("3|3")));
    assert_eq!(grid.key_at(0), Ok(region("0|1")));
    assert_eq!(
        grid.key_at(15),
        Err(Error::IndexOutOfRange { index: 15, len: 15 })
    );
    assert_eq!(grid.get_or(&region("9|9"), "none"), "none");

    // Keys of column 0, walked down from the footer.
    let column = grid.lower_with(
        &region("0:4|4"),
        Walk::INCLUSIVE,
        |k: &Region| k.x().start() == 0,
        |k: &Region| k.x().start() < 0,
    );
    assert_eq!(column, regions(&["0:4|4", "0:2|0", "0|3", "0|2", "0|1"]));
    assert_eq!(grid.head_map(&region("0:2|0"), false).len(), 3);
}

#[test]
fn test_relative_position() {
    let a = region("0:2|0:2");
    assert_eq!(a.relative_to(&region("2:4|0:2")), Relation::Leads);
    assert_eq!(region("2:4|0:2").relative_to(&a), Relation::Trails);
    // Separated on both axes without being strictly before: Y decides.
    assert_eq!(a.relative_to(&region("2:4|2:4")), Relation::Below);
    assert_eq!(region("2:4|2:4").relative_to(&a), Relation::Above);
    assert_eq!(a.relative_to(&region("1|1")), Relation::Intersects);
    assert!(a.relative_to(&region("5|0")).is_ahead());
}

#[test]
fn test_try_from_map_validates() {
    let entries = BTreeMap::from([(region("0:2|0"), 1), (region("2:4|0"), 2)]);
    let grid = SparseGrid::try_from_map(entries).unwrap();
    assert_eq!(grid.get_matches(&region("2:4|0")), regions(&["2:4|0"]));

    let entries = BTreeMap::from([(region("0:2|0:2"), 1), (region("1|1"), 2)]);
    let err = SparseGrid::try_from_map(entries).unwrap_err();
    assert!(err.is_invariant_error());
    assert!(!err.is_spec_error());
}

#[test]
fn test_bad_specs() {
    for spec in ["", "1", "1|2|3", "a|1", "1| ", "3:1|0"] {
        let err = Region::of(spec).unwrap_err();
        assert!(err.is_spec_error(), "{spec}: {err}");
    }
}

#[test]
fn test_match_only_config_keeps_overlaps() {
    let grid: SparseGrid<Region, u8> =
        SparseGrid::with_config(Config::default().with_evict_on([Condition::Match]));
    grid.put(region("0:4|0:4"), 1);
    grid.put(region("1|1"), 2);
    assert_eq!(grid.put(region("1|1"), 3), vec![(region("1|1"), 2)]);
    assert_eq!(grid.len(), 2);
    assert!(grid.may_overlap());
    assert_eq!(grid.get_intersecting(&region("1:3|1")), regions(&["0:4|0:4", "1|1"]));
}
