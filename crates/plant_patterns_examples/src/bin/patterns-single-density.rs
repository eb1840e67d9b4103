use plant_patterns::prelude::*;
use plant_patterns_examples::{init_tracing, render_pattern_to_png, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let generator = PatternGenerator::try_new(GeneratorConfig::default())?;
    let mut rng = StdRng::seed_from_u64(42);

    let (pattern, stats) = generator.generate_with_stats(1500.0, &mut rng)?;
    tracing::info!(
        "{} points | radius {:.4} | {} border candidates discarded.",
        pattern.len(),
        pattern.radius(),
        stats.discarded
    );

    render_pattern_to_png(
        &pattern,
        &RenderConfig::new(800),
        "patterns-single-density.png",
    )?;
    Ok(())
}
