use clap::Parser;
use std::path::PathBuf;
use territory::{CellGrid, Pipeline, TerritorySettings, generate_grid, save_territories};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Разбиение мира на территории с уровнями сложности
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию — встроенные значения)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Файл биомов `x,z,LABEL:count,…`; без него сетка генерируется шумом
    #[arg(short, long)]
    biomes: Option<PathBuf>,

    /// Каталог для JSON-файлов территорий
    #[arg(short, long, default_value = "territories")]
    output: PathBuf,

    /// Фильтр логов; перекрывает значение из конфигурации, но не `RUST_LOG`
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => TerritorySettings::from_toml_file(path)?,
        None => TerritorySettings::default(),
    };

    let default_filter = cli.log_level.as_deref().unwrap_or(&settings.log_filter);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let grid = match &cli.biomes {
        Some(path) => CellGrid::from_biomes_file(path)?,
        None => {
            info!("Файл биомов не задан, генерируется синтетическая сетка");
            generate_grid(&settings.synthetic)
        }
    };

    let tick = settings.tick();
    let mut pipeline = Pipeline::new(grid, settings);
    let mut ticks = 0usize;
    while pipeline.run_for(tick)? {
        ticks += 1;
    }
    info!("Конвейер завершён за {} тактов", ticks + 1);

    let diagnostics = pipeline.diagnostics();
    for line in diagnostics.summary_lines() {
        info!("{line}");
    }
    for (category, center) in pipeline.essential_seeds() {
        info!("Старт {category}: {center}");
    }
    if !diagnostics.missing_essentials.is_empty() {
        warn!(
            "Не найдено стартовых зон для {} категорий",
            diagnostics.missing_essentials.len()
        );
    }

    let territories = pipeline.territories()?;
    save_territories(&cli.output, territories)?;
    Ok(())
}
