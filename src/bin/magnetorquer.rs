use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uom::si::{
    area::square_millimeter,
    electric_current::ampere,
    electrical_resistance::ohm,
    f64::{ElectricalResistance, Length, Power},
    length::millimeter,
    power::watt,
};

use magnetorquer_models::{
    config::BoardConfig,
    export::kicad::export_allocation,
    models::magnetorquer::{
        AllocationConfig, AnySpiral, ConstantWidthOptimizer, DesignKind, LayerAllocation,
        LayerDesign, SpiralFamily, TraceLayout, VariableWidthDesigner, WidthRule, allocate,
        compare,
        moment::{dipole_moment, drive_current},
        resistance_match::{MatchConfig, match_multiplier, match_spacing},
    },
    support::{
        constraint::{NonNegative, StrictlyPositive},
        trace::Layer,
    },
};

#[derive(Parser)]
#[command(version, about = "Design area-sum maximizing PCB magnetorquers", long_about = None)]
struct Cli {
    /// Board configuration file (TOML)
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Allocate the resistance budget across all layers and report the design
    Optimize(OptimizeArgs),

    /// Solve a single layer for a target resistance
    Match(MatchArgs),

    /// Compare every spiral design on one layer at a fixed resistance
    Compare(CompareArgs),
}

#[derive(Args)]
struct OptimizeArgs {
    /// Spiral family to optimize
    #[arg(long, value_enum, default_value_t = Family::Square)]
    family: Family,

    /// Width relation used by the variable family
    #[arg(long, value_enum, default_value_t = Relation::BoundedInverseRadius)]
    relation: Relation,

    /// Write KiCad segments and vias for the design to this file
    #[arg(long, value_name = "FILE")]
    kicad: Option<PathBuf>,

    /// Report the dipole moment at this dissipated power, in watts
    #[arg(long, value_name = "WATTS")]
    power: Option<f64>,
}

#[derive(Args)]
struct MatchArgs {
    /// Target resistance of the layer, in ohms
    #[arg(long, value_name = "OHMS")]
    resistance: f64,

    #[arg(long, value_enum, default_value_t = LayerArg::Exterior)]
    layer: LayerArg,

    /// Trace length in millimetres; solves for the constant-width spacing
    #[arg(long, value_name = "MM", conflicts_with = "relation")]
    length: Option<f64>,

    /// Width relation; solves for the variable-width multiplier
    #[arg(long, value_enum, required_unless_present = "length")]
    relation: Option<Relation>,
}

#[derive(Args)]
struct CompareArgs {
    /// Resistance of the layer, in ohms
    #[arg(long, value_name = "OHMS")]
    resistance: f64,

    #[arg(long, value_enum, default_value_t = LayerArg::Exterior)]
    layer: LayerArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum Family {
    Square,
    Circular,
    Variable,
}

#[derive(Clone, Copy, ValueEnum)]
enum Relation {
    InverseRadius,
    InverseRadiusLessGap,
    Constant,
    BoundedInverseRadius,
}

impl From<Relation> for WidthRule {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::InverseRadius => Self::InverseRadius,
            Relation::InverseRadiusLessGap => Self::InverseRadiusLessGap,
            Relation::Constant => Self::Constant,
            Relation::BoundedInverseRadius => Self::BoundedInverseRadius,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    Exterior,
    Interior,
}

impl From<LayerArg> for Layer {
    fn from(layer: LayerArg) -> Self {
        match layer {
            LayerArg::Exterior => Self::Exterior,
            LayerArg::Interior => Self::Interior,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let cli = Cli::parse();
    let board = BoardConfig::load(&cli.config)
        .with_context(|| format!("Failed to load board configuration: {:?}", cli.config))?;

    match cli.command {
        Command::Optimize(args) => optimize(&board, &args),
        Command::Match(args) => match_layer(&board, &args),
        Command::Compare(args) => compare_designs(&board, &args),
    }
}

fn optimize(board: &BoardConfig, args: &OptimizeArgs) -> Result<()> {
    let search = AllocationConfig::default();
    let (kind, allocation) = match args.family {
        Family::Square | Family::Circular => {
            let family = match args.family {
                Family::Circular => SpiralFamily::Circular,
                _ => SpiralFamily::Square,
            };
            let spiral = AnySpiral::new(family, board.outer_radius)
                .context("Invalid outer radius")?;
            let optimizer = ConstantWidthOptimizer::new(board, spiral);
            let allocation =
                allocate(board, &optimizer, &search).context("Failed to allocate resistance")?;
            (DesignKind::Constant(family), allocation)
        }
        Family::Variable => {
            let rule = WidthRule::from(args.relation);
            let designer = VariableWidthDesigner::new(board, rule.relation(board));
            let allocation =
                allocate(board, &designer, &search).context("Failed to allocate resistance")?;
            (DesignKind::VariableWidth(rule), allocation)
        }
    };

    print_allocation(board, kind, &allocation);

    if let Some(watts) = args.power {
        let power = NonNegative::new(Power::new::<watt>(watts)).context("Invalid power")?;
        let resistance = StrictlyPositive::new(board.resistance).context("Invalid resistance")?;
        let current = drive_current(resistance, power);
        let moment = dipole_moment(allocation.total_area_sum, resistance, power);
        println!("Drive current: {:.4} A", current.get::<ampere>());
        println!("Dipole moment: {:.6} A·m²", moment.value);
    }

    if let Some(path) = &args.kicad {
        let kicad = export_allocation(board, &allocation, kind)
            .context("Failed to export KiCad geometry")?;
        std::fs::write(path, kicad.to_string())
            .with_context(|| format!("Failed to write KiCad output: {path:?}"))?;
        println!(
            "Wrote {} segments and {} vias to {}",
            kicad.segments().len(),
            kicad.vias().len(),
            path.display()
        );
    }

    Ok(())
}

fn match_layer(board: &BoardConfig, args: &MatchArgs) -> Result<()> {
    let target = StrictlyPositive::new(ElectricalResistance::new::<ohm>(args.resistance))
        .context("Invalid target resistance")?;
    let layer = Layer::from(args.layer);
    let config = MatchConfig::default();

    if let Some(length) = args.length {
        let length = Length::new::<millimeter>(length);
        let matched = match_spacing(board, layer, length, target, &config)
            .context("Failed to match spacing")?;
        println!("Spacing: {:.4} mm", matched.spacing.get::<millimeter>());
        println!("Width: {:.4} mm", matched.width.get::<millimeter>());
        println!("Resistance: {:.4} Ω", matched.resistance.get::<ohm>());
        return Ok(());
    }

    let rule = args
        .relation
        .map(WidthRule::from)
        .context("Either --length or --relation is required")?;
    let designer = VariableWidthDesigner::new(board, rule.relation(board));
    let spiral = designer.spiral(layer).context("Invalid board")?;
    let winding =
        match_multiplier(&spiral, target, &config).context("Failed to match multiplier")?;
    println!("Multiplier: {:.6}", winding.multiplier);
    println!("Coils: {}", winding.num_of_coils);
    println!("Length: {:.2} mm", winding.length.get::<millimeter>());
    println!("Area-sum: {:.2} mm²", winding.area_sum.get::<square_millimeter>());
    println!("Resistance: {:.4} Ω", winding.resistance.get::<ohm>());
    Ok(())
}

fn compare_designs(board: &BoardConfig, args: &CompareArgs) -> Result<()> {
    let resistance = ElectricalResistance::new::<ohm>(args.resistance);
    let comparisons = compare(board, resistance, args.layer.into(), &WidthRule::ALL)
        .context("Invalid board")?;

    for comparison in comparisons {
        match comparison.result {
            Ok(design) => println!(
                "{:<34} {:>12.2} mm²",
                comparison.kind.to_string(),
                design.properties.area_sum.get::<square_millimeter>()
            ),
            Err(error) => println!("{:<34} failed: {error}", comparison.kind.to_string()),
        }
    }
    Ok(())
}

fn print_allocation(board: &BoardConfig, kind: DesignKind, allocation: &LayerAllocation) {
    println!("Design: {kind}");
    println!("Layers: {}", board.layers);
    print_layer("Exterior", &allocation.exterior);
    if let Some(interior) = &allocation.interior {
        print_layer("Interior", interior);
    }
    println!(
        "Total area-sum: {:.2} mm²",
        allocation.total_area_sum.get::<square_millimeter>()
    );
}

fn print_layer(name: &str, design: &LayerDesign) {
    let layout = match design.layout {
        TraceLayout::Spacing(spacing) => format!("spacing {:.4} mm", spacing.get::<millimeter>()),
        TraceLayout::WidthMultiplier(multiplier) => format!("multiplier {multiplier:.6}"),
    };
    println!(
        "{name}: {:.4} Ω, {layout}, length {:.2} mm, {:.2} coils, area-sum {:.2} mm²",
        design.resistance.get::<ohm>(),
        design.length.get::<millimeter>(),
        design.properties.num_of_coils,
        design.properties.area_sum.get::<square_millimeter>(),
    );
}
