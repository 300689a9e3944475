use clap::Parser;
use small_batch::app::runner;
use small_batch::config::ConversionArgs;
use small_batch::ConversionPipeline;

fn main() {
    let args = ConversionArgs::parse();
    args.common.init_logging();
    tracing::info!("🚀 Starting convert_numbers");

    let code = match args.settings().and_then(runner::validated) {
        Ok(settings) => runner::execute(ConversionPipeline::new(), &settings, &args.common.input),
        Err(e) => runner::report_failure(&e),
    };

    std::process::exit(code);
}
