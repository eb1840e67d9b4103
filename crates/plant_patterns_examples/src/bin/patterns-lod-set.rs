use plant_patterns::prelude::*;
use plant_patterns_examples::{
    init_tracing, render_pattern_set_to_png, PatternStyle, RenderConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = PatternSetConfig::new(200, 2000, 5)
        .with_levels(8, 16)
        .with_tile_cache_size(256)
        .with_distances(1500.0, 200.0)
        .with_interpolation(DensityInterpolation::Jittered)
        .with_streams(RandomStreams::PerLevel { base_seed: 7 });

    let mut rng = StdRng::seed_from_u64(0);
    let mut sink = FnSink::new(|event| {
        if let PatternSetEvent::LevelFinished {
            level,
            density,
            vertices,
            ..
        } = event
        {
            println!("level {level}: density {density:.1} -> {vertices} vertices");
        }
    });
    let set = PatternSet::build_with_events(&config, &mut rng, &mut sink)?;
    println!(
        "vertex counts span {}..={}",
        set.min_vertices(),
        set.max_vertices()
    );

    let render = RenderConfig::new(400)
        .with_background([250, 248, 240])
        .with_style(PatternStyle {
            shade_by_scalar: true,
            ..PatternStyle::default()
        });
    render_pattern_set_to_png(&set, &render, "patterns-lod-set.png")?;
    Ok(())
}
