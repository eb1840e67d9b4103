use plant_patterns::prelude::*;
use plant_patterns_examples::{init_tracing, render_pattern_set_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let base = PatternSetConfig::new(300, 1200, 4);

    // Shared: every level depends on the draws consumed by the levels before it.
    let mut rng = StdRng::seed_from_u64(42);
    let shared = PatternSet::build(&base, &mut rng)?;

    // Per level: each level reproduces on its own, whatever the build RNG.
    let per_level_config = base
        .clone()
        .with_streams(RandomStreams::PerLevel { base_seed: 42 });
    let per_level = PatternSet::build(&per_level_config, &mut rng)?;

    for (a, b) in shared.iter().zip(per_level.iter()) {
        println!(
            "level {} density {:.0}: shared {} points, per-level {} points",
            a.index(),
            a.density(),
            a.pattern().len(),
            b.pattern().len()
        );
    }

    let config = RenderConfig::new(300);
    render_pattern_set_to_png(&shared, &config, "patterns-shared.png")?;
    render_pattern_set_to_png(&per_level, &config, "patterns-per-level.png")?;
    Ok(())
}
