//! # Path Joining
//!
//! Merges open paths whose endpoints coincide within a tolerance into
//! longer chains. Cyclic paths pass through untouched. Endpoint matching
//! runs over the fixed-radius neighbor index, so joining stays cheap even
//! for drawings with many segments.

use dxfkit_core::{Frnn2D, Path, Point2};
use tracing::debug;

/// Result of a joining pass.
///
/// Carries the joined paths plus the spots where endpoint matching was
/// ambiguous. Ambiguities never fail the run; callers decide how loudly
/// to report them.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    /// Joined paths. Unjoined paths keep their input order; a chain
    /// appears at the position of its starting member.
    pub paths: Vec<Path>,
    /// Endpoints that had more than one unpaired partner within range.
    pub ambiguous_positions: Vec<Point2>,
    /// Chain tails that still point back into the chain, meaning the
    /// merged traversal direction had to be chosen arbitrarily.
    pub ambiguous_directions: Vec<Point2>,
}

/// One end of an open path. Ends are addressed as `2 * path + 0` for the
/// start and `2 * path + 1` for the end.
struct EndInfo {
    p: Point2,
    pairing_done: bool,
    neighbor: Option<usize>,
}

#[derive(Clone, Default)]
struct ChainState {
    in_chain: bool,
    is_chain_start: bool,
    in_output: bool,
    cyclic: bool,
}

/// Walks a chain starting at `first`, which must have a neighbor at
/// exactly one of its ends. Returns each member path together with a flag
/// telling whether its points are traversed in stored order.
fn chain_members(ends: &[EndInfo], first: usize) -> Vec<(usize, bool)> {
    let start = &ends[2 * first];
    let end = &ends[2 * first + 1];
    debug_assert!(start.neighbor.is_some() != end.neighbor.is_some());

    let mut members = vec![(first, start.neighbor.is_none())];
    let mut cur = start.neighbor.or(end.neighbor);
    while let Some(id) = cur {
        let path = id / 2;
        let entered_at_start = id % 2 == 0;
        members.push((path, entered_at_start));
        cur = if entered_at_start {
            ends[2 * path + 1].neighbor
        } else {
            ends[2 * path].neighbor
        };
    }
    members
}

/// Merges open paths whose endpoints lie within `max_error` of each other
/// into longer chains.
///
/// Each endpoint pairs with at most one partner; a chain of `k` member
/// paths drops the shared point at each of its joins. A chain that closes
/// back onto its own start becomes a single cyclic path with the
/// redundant closing vertex removed. Joined chains take their `cyclic`,
/// `directed` and `optimize_start` flags from whether they closed into a
/// ring; `curved` flags and source indices are merged from all members.
pub fn join_paths(paths: &[Path], max_error: f64) -> JoinOutcome {
    let mut ends: Vec<EndInfo> = Vec::with_capacity(paths.len() * 2);
    for path in paths {
        for p in [path.start_point(), path.end_point()] {
            ends.push(EndInfo {
                p,
                pairing_done: false,
                neighbor: None,
            });
        }
    }

    let mut ambiguous_positions = Vec::new();
    let mut ambiguous_directions = Vec::new();

    // Register the ends of every open path, then pair each one with the
    // first unpaired candidate in range. Additional candidates mark the
    // position as ambiguous.
    let mut frnn = Frnn2D::new(max_error);
    for (i, path) in paths.iter().enumerate() {
        if path.cyclic {
            continue;
        }
        frnn.insert(ends[2 * i].p, 2 * i);
        frnn.insert(ends[2 * i + 1].p, 2 * i + 1);
    }

    for (i, path) in paths.iter().enumerate() {
        if path.cyclic {
            continue;
        }
        for cur in [2 * i, 2 * i + 1] {
            let cur_p = ends[cur].p;
            let mut pos_reported = false;
            frnn.query_candidates(cur_p, |&cand| {
                if cand / 2 == i {
                    return; // the other point belongs to the same path
                }
                if cur_p.distance(ends[cand].p) > max_error {
                    return;
                }
                if ends[cand].pairing_done {
                    return;
                }

                ends[cand].pairing_done = true;
                if ends[cur].pairing_done {
                    if !pos_reported {
                        ambiguous_positions.push(cur_p);
                        pos_reported = true;
                    }
                    return;
                }
                ends[cur].pairing_done = true;

                debug_assert!(ends[cur].neighbor.is_none() && ends[cand].neighbor.is_none());
                ends[cur].neighbor = Some(cand);
                ends[cand].neighbor = Some(cur);
            });
        }
    }

    // Mark chain membership starting from paths with a neighbor at
    // exactly one end. A chain whose tail end still points back into the
    // chain could equally well run the other way round.
    let mut state = vec![ChainState::default(); paths.len()];
    for i in 0..paths.len() {
        if state[i].in_chain {
            continue;
        }
        let has_start = ends[2 * i].neighbor.is_some();
        let has_end = ends[2 * i + 1].neighbor.is_some();
        if has_start == has_end {
            continue; // interior of a chain, or not connected at all
        }

        let members = chain_members(&ends, i);
        for &(member, _) in &members {
            debug_assert!(!state[member].in_chain);
            state[member].in_chain = true;
        }

        let last = members[members.len() - 1].0;
        let (begin, tail) = if has_start { (last, i) } else { (i, last) };
        state[begin].is_chain_start = true;

        if ends[2 * tail + 1].neighbor.is_some() {
            ambiguous_directions.push(ends[2 * tail + 1].p);
        }
    }

    // Any path still fully linked sits on a ring. Break the ring at the
    // first such path and treat it as the chain start.
    for i in 0..paths.len() {
        if state[i].in_chain {
            continue;
        }
        let other = match ends[2 * i].neighbor {
            Some(other) => other,
            None => continue,
        };
        ends[other].neighbor = None;
        ends[2 * i].neighbor = None;
        state[i].is_chain_start = true;

        for (member, _) in chain_members(&ends, i) {
            state[member].in_chain = true;
            state[member].cyclic = true;
        }
    }

    let mut out: Vec<Path> = Vec::with_capacity(paths.len());
    for i in 0..paths.len() {
        if state[i].in_output {
            continue;
        }
        if !state[i].in_chain {
            out.push(paths[i].clone());
            continue;
        }
        if !state[i].is_chain_start {
            continue;
        }

        let members = chain_members(&ends, i);
        // One shared point is dropped per join.
        let total: usize = 1
            + members
                .iter()
                .map(|&(member, _)| paths[member].points.len() - 1)
                .sum::<usize>();

        let cyclic = state[i].cyclic;
        let mut joined = Path {
            cyclic,
            optimize_start: cyclic,
            directed: !cyclic,
            ..Path::default()
        };
        joined.points.reserve(total);

        let mut skip = 0;
        for (member, forward) in members {
            debug_assert!(state[member].in_chain && !state[member].in_output);
            state[member].in_output = true;

            let src = &paths[member];
            if src.curved {
                joined.curved = true;
            }
            joined
                .source_path_indices
                .extend(src.source_path_indices.iter().copied());

            if forward {
                joined.points.extend_from_slice(&src.points[skip..]);
            } else {
                joined.points.extend(src.points.iter().rev().skip(skip));
            }
            skip = 1;
        }
        debug_assert_eq!(joined.points.len(), total);

        // The ring was broken between the last member and the chain
        // start, so the final vertex duplicates the first one within
        // tolerance. Cyclic paths do not store the closing point.
        if cyclic && joined.points.len() > 1 {
            joined.points.pop();
        }

        out.push(joined);
    }

    debug!(
        "Joined {} paths into {} ({} ambiguous positions, {} ambiguous directions)",
        paths.len(),
        out.len(),
        ambiguous_positions.len(),
        ambiguous_directions.len()
    );

    JoinOutcome {
        paths: out,
        ambiguous_positions,
        ambiguous_directions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(ax: f64, ay: f64, bx: f64, by: f64) -> Path {
        Path {
            points: vec![Point2::new(ax, ay), Point2::new(bx, by)],
            ..Path::default()
        }
    }

    #[test]
    fn test_touching_lines_join_into_one_chain() {
        let paths = vec![line(0.0, 0.0, 10.0, 0.0), line(10.0, 0.0, 10.0, 10.0)];
        let outcome = join_paths(&paths, 0.01);

        assert_eq!(outcome.paths.len(), 1);
        let joined = &outcome.paths[0];
        assert_eq!(
            joined.points,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
            ]
        );
        assert!(!joined.cyclic);
        assert!(joined.directed);
        assert!(!joined.optimize_start);
        assert!(outcome.ambiguous_positions.is_empty());
        assert!(outcome.ambiguous_directions.is_empty());
    }

    #[test]
    fn test_gap_within_tolerance_is_bridged() {
        let paths = vec![line(0.0, 0.0, 5.0, 0.0), line(5.0, 0.004, 9.0, 0.0)];
        let outcome = join_paths(&paths, 0.01);

        assert_eq!(outcome.paths.len(), 1);
        assert_eq!(outcome.paths[0].points.len(), 3);
    }

    #[test]
    fn test_distant_paths_stay_unchanged() {
        let paths = vec![line(0.0, 0.0, 1.0, 0.0), line(5.0, 5.0, 6.0, 5.0)];
        let outcome = join_paths(&paths, 0.01);

        assert_eq!(outcome.paths.len(), 2);
        for (input, output) in paths.iter().zip(&outcome.paths) {
            assert_eq!(input.points, output.points);
            assert_eq!(input.cyclic, output.cyclic);
        }
    }

    #[test]
    fn test_reversed_member_is_flipped_and_reported() {
        // The second line runs backwards into the shared corner, so the
        // chain has to pick a direction for it.
        let paths = vec![line(0.0, 0.0, 5.0, 0.0), line(9.0, 0.0, 5.0, 0.0)];
        let outcome = join_paths(&paths, 0.01);

        assert_eq!(outcome.paths.len(), 1);
        assert_eq!(
            outcome.paths[0].points,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(5.0, 0.0),
                Point2::new(9.0, 0.0),
            ]
        );
        assert_eq!(outcome.ambiguous_directions, vec![Point2::new(5.0, 0.0)]);
    }

    #[test]
    fn test_square_closes_into_cyclic_ring() {
        let paths = vec![
            line(0.0, 0.0, 1.0, 0.0),
            line(1.0, 1.0, 0.0, 1.0),
            line(1.0, 0.0, 1.0, 1.0),
            line(0.0, 1.0, 0.0, 0.0),
        ];
        let outcome = join_paths(&paths, 0.01);

        assert_eq!(outcome.paths.len(), 1);
        let ring = &outcome.paths[0];
        assert!(ring.cyclic);
        assert!(ring.optimize_start);
        assert!(!ring.directed);
        assert_eq!(
            ring.points,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_chain_point_count_drops_one_per_join() {
        let paths = vec![
            Path {
                points: vec![
                    Point2::new(0.0, 0.0),
                    Point2::new(1.0, 0.0),
                    Point2::new(2.0, 0.0),
                ],
                ..Path::default()
            },
            line(2.0, 0.0, 3.0, 0.0),
            Path {
                points: vec![
                    Point2::new(3.0, 0.0),
                    Point2::new(4.0, 0.0),
                    Point2::new(5.0, 0.0),
                    Point2::new(6.0, 0.0),
                ],
                ..Path::default()
            },
        ];
        let outcome = join_paths(&paths, 0.01);

        assert_eq!(outcome.paths.len(), 1);
        assert_eq!(outcome.paths[0].points.len(), 3 + 2 + 4 - 2);
    }

    #[test]
    fn test_cyclic_input_is_never_joined() {
        let circle_like = Path {
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
            ],
            cyclic: true,
            ..Path::default()
        };
        let paths = vec![circle_like, line(0.0, 0.0, -5.0, 0.0)];
        let outcome = join_paths(&paths, 0.01);

        assert_eq!(outcome.paths.len(), 2);
        assert!(outcome.paths[0].cyclic);
        assert_eq!(outcome.paths[1].points.len(), 2);
    }

    #[test]
    fn test_three_way_corner_reports_ambiguity() {
        // Three endpoints meet at the origin; only two of them can pair.
        let paths = vec![
            line(0.0, 0.0, 1.0, 0.0),
            line(0.0, 0.0, 0.0, 1.0),
            line(0.0, 0.0, -1.0, -1.0),
        ];
        let outcome = join_paths(&paths, 0.01);

        assert!(!outcome.ambiguous_positions.is_empty());
        assert!(outcome
            .ambiguous_positions
            .iter()
            .all(|p| *p == Point2::new(0.0, 0.0)));
    }

    #[test]
    fn test_curved_flag_and_sources_are_merged() {
        let mut a = line(0.0, 0.0, 1.0, 0.0);
        a.source_path_indices.insert(0);
        let mut b = line(1.0, 0.0, 2.0, 0.0);
        b.curved = true;
        b.source_path_indices.insert(1);

        let outcome = join_paths(&[a, b], 0.01);

        assert_eq!(outcome.paths.len(), 1);
        let joined = &outcome.paths[0];
        assert!(joined.curved);
        assert_eq!(
            joined.source_path_indices.iter().copied().collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let outcome = join_paths(&[], 0.5);
        assert!(outcome.paths.is_empty());
        assert!(outcome.ambiguous_positions.is_empty());
        assert!(outcome.ambiguous_directions.is_empty());
    }
}
