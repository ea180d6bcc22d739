use covarrect::reads::{CigarProjector, RefOp};

#[test]
fn no_indels() {
    let ops = vec![RefOp::Match(4)];
    let (seq, pos) = CigarProjector::project(&ops, b"ACGT", 0);
    assert_eq!(seq, vec!['A', 'C', 'G', 'T']);
    assert_eq!(pos, vec![0, 1, 2, 3]);
}

#[test]
fn insertion_and_deletion_e6() {
    // 1M1I1D5M1D3M over ACTCCTCGAA
    let ops = vec![
        RefOp::Match(1),
        RefOp::Ins(1),
        RefOp::Del(1),
        RefOp::Match(5),
        RefOp::Del(1),
        RefOp::Match(3),
    ];
    let (seq, _) = CigarProjector::project(&ops, b"ACTCCTCGAA", 0);
    let s: String = seq.into_iter().collect();
    assert_eq!(s, "A-TCCTC-GAA");
}

#[test]
fn leading_and_trailing_deletions_discarded() {
    let ops = vec![RefOp::Del(2), RefOp::Match(3), RefOp::Del(2)];
    let (seq, pos) = CigarProjector::project(&ops, b"ACG", 10);
    assert_eq!(seq, vec!['A', 'C', 'G']);
    assert_eq!(pos, vec![10, 11, 12]);
}

#[test]
fn only_insertions_projects_empty() {
    let ops = vec![RefOp::Ins(5)];
    let (seq, pos) = CigarProjector::project(&ops, b"AAAAA", 0);
    assert!(seq.is_empty());
    assert!(pos.is_empty());
}
