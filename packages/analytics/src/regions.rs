//! Regional attribution and ranking.
//!
//! Attributes incidents to administrative regions by exact point-in-polygon
//! containment and ranks regions by how many incidents they hold. Ranking
//! is deterministic: it uses no randomness and keeps input order on ties.

use wildfire_impact_geography_models::{RegionActivity, RegionGeometry, RegionImpact};
use wildfire_impact_incident_models::IncidentSet;
use wildfire_impact_spatial::RegionIndex;

/// Default number of ranked regions.
pub const DEFAULT_TOP_N: usize = 5;

/// Per-slot incident tallies.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    total: u32,
    active: u32,
}

/// Counts valid and active incidents inside every indexed region.
///
/// An incident inside overlapping regions counts towards each of them.
fn tally(incidents: &IncidentSet, index: &RegionIndex) -> Vec<Tally> {
    let mut tallies = vec![Tally::default(); index.len()];

    for incident in incidents.valid() {
        let (lng, lat) = incident.position();
        for slot in index.containing(lng, lat) {
            let entry = &mut tallies[slot];
            entry.total += 1;
            if incident.status.is_active() {
                entry.active += 1;
            }
        }
    }

    tallies
}

/// Ranks the given regions by incident count.
///
/// Builds a [`RegionIndex`] over `regions` and delegates to
/// [`rank_indexed`]. Regions failing validation are skipped.
#[must_use]
pub fn rank_regions(
    incidents: &IncidentSet,
    regions: &[RegionGeometry],
    top_n: usize,
) -> Vec<RegionImpact> {
    rank_indexed(incidents, &RegionIndex::build(regions), top_n)
}

/// Ranks indexed regions by incident count.
///
/// Returns at most `top_n` regions, each holding at least one incident,
/// ordered by descending incident count. Regions with equal counts keep
/// their input order.
#[must_use]
pub fn rank_indexed(incidents: &IncidentSet, index: &RegionIndex, top_n: usize) -> Vec<RegionImpact> {
    let tallies = tally(incidents, index);

    let mut ranked: Vec<RegionImpact> = index
        .regions()
        .zip(&tallies)
        .filter(|(_, tally)| tally.total > 0)
        .map(|((_, id, name), tally)| RegionImpact::new(id, name, tally.total, tally.active))
        .collect();

    ranked.sort_by(|a, b| b.incident_count.cmp(&a.incident_count));
    ranked.truncate(top_n);

    log::debug!(
        "Ranked {} of {} regions with incidents",
        ranked.len(),
        tallies.iter().filter(|t| t.total > 0).count()
    );

    ranked
}

/// Active-incident count for every indexed region, zeros included, in
/// input order.
#[must_use]
pub fn active_counts_by_region(incidents: &IncidentSet, index: &RegionIndex) -> Vec<RegionActivity> {
    index
        .regions()
        .zip(tally(incidents, index))
        .map(|((_, id, _), tally)| RegionActivity {
            id: id.to_string(),
            active_incident_count: tally.active,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use wildfire_impact_geography_models::{RiskLevel, Ring};
    use wildfire_impact_incident_models::{Incident, IncidentStatus};

    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]
    }

    fn region(id: &str, polygons: Vec<Vec<Ring>>) -> RegionGeometry {
        RegionGeometry {
            id: id.to_string(),
            name: format!("Region {id}"),
            polygons,
        }
    }

    fn fire(id: &str, lng: f64, lat: f64, status: IncidentStatus) -> Incident {
        Incident {
            id: id.to_string(),
            lat,
            lng,
            intensity: 0.5,
            status,
            radius_km: 1.0,
            name: None,
        }
    }

    /// Seven side-by-side one-degree cells along the equator.
    fn strip() -> Vec<RegionGeometry> {
        (0..7)
            .map(|i| {
                let x = f64::from(i);
                region(&format!("r{i}"), vec![vec![rect(x, 0.0, x + 1.0, 1.0)]])
            })
            .collect()
    }

    #[test]
    fn ranks_by_count_and_limits_to_top_n() {
        let regions = strip();
        let mut fires = Vec::new();
        // Region i gets i fires.
        for i in 0..7u32 {
            for k in 0..i {
                fires.push(fire(
                    &format!("{i}-{k}"),
                    f64::from(i) + 0.5,
                    0.5,
                    IncidentStatus::Confirmed,
                ));
            }
        }
        let set = IncidentSet::from_records(fires);

        let ranked = rank_regions(&set, &regions, DEFAULT_TOP_N);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r6", "r5", "r4", "r3", "r2"]);
        assert!(ranked.iter().all(|r| r.incident_count > 0));
        assert!(
            ranked
                .windows(2)
                .all(|w| w[0].incident_count >= w[1].incident_count)
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let regions = strip();
        let set = IncidentSet::from_records(vec![
            fire("a", 4.5, 0.5, IncidentStatus::Detected),
            fire("b", 1.5, 0.5, IncidentStatus::Detected),
            fire("c", 3.5, 0.5, IncidentStatus::Detected),
        ]);

        let ranked = rank_regions(&set, &regions, DEFAULT_TOP_N);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r1", "r3", "r4"]);
    }

    #[test]
    fn risk_levels_follow_active_counts() {
        let regions = strip();
        let set = IncidentSet::from_records(vec![
            fire("1", 0.5, 0.5, IncidentStatus::Confirmed),
            fire("2", 0.5, 0.5, IncidentStatus::Detected),
            fire("3", 0.5, 0.5, IncidentStatus::Confirmed),
            fire("4", 1.5, 0.5, IncidentStatus::Detected),
            fire("5", 1.5, 0.5, IncidentStatus::Contained),
            fire("6", 2.5, 0.5, IncidentStatus::Contained),
        ]);

        let ranked = rank_regions(&set, &regions, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 3);

        for impact in &ranked {
            let expected = match impact.active_incident_count {
                0 => RiskLevel::Low,
                1 | 2 => RiskLevel::Medium,
                _ => RiskLevel::High,
            };
            assert_eq!(impact.risk_level, expected, "region {}", impact.id);
        }
        assert_eq!(ranked[0].risk_level, RiskLevel::High);
        assert_eq!(ranked[1].risk_level, RiskLevel::Medium);
        assert_eq!(ranked[2].id, "r2");
        assert_eq!(ranked[2].incident_count, 1);
        assert_eq!(ranked[2].risk_level, RiskLevel::Low);
    }

    #[test]
    fn incident_in_hole_is_not_counted() {
        let regions = vec![region(
            "donut",
            vec![vec![rect(0.0, 0.0, 10.0, 10.0), rect(4.0, 4.0, 6.0, 6.0)]],
        )];
        let set = IncidentSet::from_records(vec![fire(
            "hole",
            5.0,
            5.0,
            IncidentStatus::Confirmed,
        )]);

        assert!(rank_regions(&set, &regions, DEFAULT_TOP_N).is_empty());
    }

    #[test]
    fn false_alarms_are_not_counted() {
        let regions = strip();
        let set = IncidentSet::from_records(vec![fire(
            "fa",
            0.5,
            0.5,
            IncidentStatus::FalseAlarm,
        )]);
        assert!(rank_regions(&set, &regions, DEFAULT_TOP_N).is_empty());
    }

    #[test]
    fn ranked_regions_actually_contain_their_incidents() {
        let regions = strip();
        let set = IncidentSet::from_records(vec![
            fire("in", 2.5, 0.5, IncidentStatus::Confirmed),
            fire("out", 2.5, 5.0, IncidentStatus::Confirmed),
        ]);
        let index = RegionIndex::build(&regions);

        for impact in rank_indexed(&set, &index, DEFAULT_TOP_N) {
            let held = set
                .valid()
                .filter(|i| index.region_contains(&impact.id, i.lng, i.lat))
                .count();
            assert_eq!(held, impact.incident_count as usize);
        }
    }

    #[test]
    fn invalid_regions_are_skipped_not_fatal() {
        let mut regions = strip();
        regions.insert(0, region("", vec![vec![rect(0.0, 0.0, 1.0, 1.0)]]));
        let set = IncidentSet::from_records(vec![fire("1", 0.5, 0.5, IncidentStatus::Detected)]);

        let ranked = rank_regions(&set, &regions, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, "r0");
    }

    #[test]
    fn ranking_is_repeatable() {
        let regions = strip();
        let set = IncidentSet::from_records(vec![
            fire("1", 3.5, 0.5, IncidentStatus::Detected),
            fire("2", 5.5, 0.5, IncidentStatus::Confirmed),
            fire("3", 5.5, 0.2, IncidentStatus::Contained),
        ]);

        let first = rank_regions(&set, &regions, DEFAULT_TOP_N);
        let second = rank_regions(&set, &regions, DEFAULT_TOP_N);
        assert_eq!(first, second);
    }

    #[test]
    fn activity_covers_every_region() {
        let regions = strip();
        let set = IncidentSet::from_records(vec![
            fire("1", 1.5, 0.5, IncidentStatus::Detected),
            fire("2", 1.5, 0.5, IncidentStatus::Contained),
        ]);
        let index = RegionIndex::build(&regions);

        let activity = active_counts_by_region(&set, &index);
        assert_eq!(activity.len(), 7);
        assert_eq!(activity[0].active_incident_count, 0);
        assert_eq!(activity[1].id, "r1");
        assert_eq!(activity[1].active_incident_count, 1);
    }
}
