use dialytrack_core::units::{FluidUnit, WeightUnit};
use dialytrack_core::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dialytrack")]
#[command(about = "Dialysis health metrics and plan entitlements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log metric decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a blood-pressure reading and compute its MAP
    Bp {
        /// Systolic pressure (mmHg)
        #[arg(long, allow_negative_numbers = true)]
        systolic: f64,

        /// Diastolic pressure (mmHg)
        #[arg(long, allow_negative_numbers = true)]
        diastolic: f64,
    },

    /// Compute the ultrafiltration rate of a session
    Uf {
        /// Fluid removed
        #[arg(long, allow_negative_numbers = true)]
        volume: f64,

        /// Patient weight
        #[arg(long, allow_negative_numbers = true)]
        weight: f64,

        /// Session duration in minutes
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,

        /// Unit of --volume (ml, l, fl_oz); defaults to config
        #[arg(long)]
        volume_unit: Option<FluidUnit>,

        /// Unit of --weight (kg, lb); defaults to config
        #[arg(long)]
        weight_unit: Option<WeightUnit>,
    },

    /// Detect the systolic trend in a readings file (.json or .csv)
    Trend {
        #[arg(long)]
        file: PathBuf,
    },

    /// Show usage of a resource against a plan limit
    Usage {
        /// Resource key (sessions, medications, nutrition_scans, care_team_members)
        #[arg(long)]
        resource: ResourceKey,

        /// Number already used
        #[arg(long)]
        current: u32,

        /// Plan id; defaults to config
        #[arg(long)]
        plan: Option<PlanId>,
    },

    /// Check whether a plan includes a feature
    Feature {
        /// Feature key (e.g. nutriScanAI)
        #[arg(long)]
        feature: FeatureKey,

        /// Plan id; defaults to config
        #[arg(long)]
        plan: Option<PlanId>,
    },

    /// List the subscription plans
    Plans,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        dialytrack_core::logging::init_with_level("debug");
    } else {
        dialytrack_core::logging::init();
    }

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Bp {
            systolic,
            diastolic,
        } => cmd_bp(systolic, diastolic, &config),
        Commands::Uf {
            volume,
            weight,
            duration,
            volume_unit,
            weight_unit,
        } => cmd_uf(
            volume,
            weight,
            duration,
            volume_unit.unwrap_or(config.units.fluid),
            weight_unit.unwrap_or(config.units.weight),
            &config,
        ),
        Commands::Trend { file } => cmd_trend(&file, &config),
        Commands::Usage {
            resource,
            current,
            plan,
        } => cmd_usage(resource, current, plan.unwrap_or(config.subscription.plan)),
        Commands::Feature { feature, plan } => {
            cmd_feature(feature, plan.unwrap_or(config.subscription.plan))
        }
        Commands::Plans => cmd_plans(),
    }
}

fn cmd_bp(systolic: f64, diastolic: f64, config: &Config) -> Result<()> {
    let reading = BloodPressureReading::new(
        systolic,
        diastolic,
        chrono::Utc::now(),
        ReadingSource::Unknown,
    )?;

    let classification = reading.classify(&config.blood_pressure);

    println!("Blood pressure: {}/{} mmHg", reading.systolic, reading.diastolic);
    println!(
        "  Category: {} (severity {})",
        classification.label, classification.severity_rank
    );
    match reading.mean_arterial_pressure() {
        Some(map) => println!("  MAP: {} mmHg", map),
        None => println!("  MAP: --"),
    }

    Ok(())
}

fn cmd_uf(
    volume: f64,
    weight: f64,
    duration: f64,
    volume_unit: FluidUnit,
    weight_unit: WeightUnit,
    config: &Config,
) -> Result<()> {
    let input = UfInput::new(
        volume_unit.to_ml(volume),
        weight_unit.to_kg(weight),
        duration,
    )?;

    tracing::debug!("UF input normalised to {:?}", input);

    let rate = input.rate();
    let safety = input.safety(&config.ultrafiltration);

    println!("UF rate: {:.2} ml/kg/hr", rate);
    println!("  Safety: {}", safety);
    println!(
        "  Removed {} {} over {} min at {} {}",
        volume,
        volume_unit,
        duration,
        weight,
        weight_unit
    );

    Ok(())
}

fn cmd_trend(file: &std::path::Path, config: &Config) -> Result<()> {
    let readings = load_readings(file)?;

    match detect_trend(&trend_points(&readings)) {
        Some(trend) => println!("Trend: {}", trend.label),
        None => println!(
            "Not enough readings for a trend (need at least {}, got {})",
            dialytrack_core::trend::WINDOW_SIZE + 1,
            readings.len()
        ),
    }

    if let Some(latest) = readings.last() {
        let classification = latest.classify(&config.blood_pressure);
        println!(
            "  Latest: {}/{} mmHg ({}) at {}",
            latest.systolic,
            latest.diastolic,
            classification.label,
            latest.taken_at.to_rfc3339()
        );
    }

    Ok(())
}

fn cmd_usage(resource: ResourceKey, current: u32, plan_id: PlanId) -> Result<()> {
    let table = load_plan_table()?;
    let plan = find_plan(table, plan_id)?;

    let usage = dialytrack_core::entitlement::usage_for(plan, resource, current);

    println!("{} on {} plan", resource, plan.name);
    match usage.limit {
        Some(limit) => println!(
            "  Used: {} of {} ({}%)",
            usage.current, limit, usage.percent_used
        ),
        None => println!("  Used: {} (unlimited)", usage.current),
    }
    println!("  Remaining: {}", usage.remaining);

    let status = if usage.at_limit {
        "at limit"
    } else if usage.near_limit {
        "near limit"
    } else {
        "ok"
    };
    println!("  Status: {}", status);
    println!(
        "  Can add another: {}",
        if can_add_resource(&usage) { "yes" } else { "no" }
    );

    Ok(())
}

fn cmd_feature(feature: FeatureKey, plan_id: PlanId) -> Result<()> {
    let table = load_plan_table()?;
    let plan = find_plan(table, plan_id)?;

    if has_feature(plan, feature) {
        println!("{} plan includes {}", plan.name, feature);
    } else {
        let minimum = minimum_plan_for_feature(feature);
        let minimum_name = table
            .get(minimum)
            .map(|p| p.name.as_str())
            .unwrap_or(minimum.as_str());
        println!("{} plan does not include {}", plan.name, feature);
        println!("  Upgrade required: {}", requires_upgrade(plan_id, feature));
        println!("  Minimum plan: {}", minimum_name);
    }

    Ok(())
}

fn cmd_plans() -> Result<()> {
    let table = load_plan_table()?;

    for plan in table.by_price() {
        println!(
            "{:<8} {:<8} ${:.2}/mo  ${:.2}/yr",
            plan.id, plan.name, plan.price_monthly, plan.price_yearly
        );
        println!("  {}", plan.description);

        let limits: Vec<String> = plan
            .limits
            .iter()
            .map(|(resource, limit)| match limit {
                Some(n) => format!("{} {}", resource, n),
                None => format!("{} unlimited", resource),
            })
            .collect();
        println!("  Limits: {}", limits.join(", "));

        let features: Vec<&str> = plan.features.iter().map(|f| f.as_str()).collect();
        println!("  Features: {}", features.join(", "));
        println!();
    }

    Ok(())
}

fn load_plan_table() -> Result<&'static PlanTable> {
    let table = get_default_plans();
    let errors = table.validate();
    if !errors.is_empty() {
        eprintln!("Plan table validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::PlanTable("Invalid plan table".into()));
    }
    Ok(table)
}

fn find_plan(table: &PlanTable, plan_id: PlanId) -> Result<&PlanConfig> {
    table.get(plan_id).ok_or_else(|| Error::UnknownKey {
        kind: "plan",
        key: plan_id.to_string(),
    })
}
