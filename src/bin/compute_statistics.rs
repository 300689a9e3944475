use clap::Parser;
use small_batch::app::runner;
use small_batch::config::StatisticsArgs;
use small_batch::StatisticsPipeline;

fn main() {
    let args = StatisticsArgs::parse();
    args.common.init_logging();
    tracing::info!("🚀 Starting compute_statistics");

    let code = match args.settings().and_then(runner::validated) {
        Ok(settings) => {
            let pipeline = StatisticsPipeline::new(settings.variance, settings.precision);
            runner::execute(pipeline, &settings, &args.common.input)
        }
        Err(e) => runner::report_failure(&e),
    };

    std::process::exit(code);
}
