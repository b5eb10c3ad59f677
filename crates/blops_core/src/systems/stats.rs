use blops_data::{Blop, SpeciesId, SpeciesStats};

/// Per-species population figures, one entry per species id in
/// `0..species_count` (empty species included).
#[must_use]
pub fn species_stats(blops: &[Blop], species_count: usize) -> Vec<SpeciesStats> {
    let mut stats: Vec<SpeciesStats> = (0..species_count)
        .map(|i| SpeciesStats {
            species: SpeciesId(i as u16),
            ..Default::default()
        })
        .collect();
    let mut sums = vec![(0.0f64, 0.0f64, 0.0f64); species_count];

    for b in blops {
        let Some(entry) = stats.get_mut(b.species.index()) else {
            continue;
        };
        entry.count += 1;
        let sum = &mut sums[b.species.index()];
        sum.0 += b.position.x;
        sum.1 += b.position.y;
        sum.2 += b.velocity.speed();
    }

    for (entry, (sx, sy, ss)) in stats.iter_mut().zip(sums) {
        if entry.count > 0 {
            let n = entry.count as f64;
            entry.centroid = (sx / n, sy / n);
            entry.mean_speed = ss / n;
        }
    }

    stats
}
