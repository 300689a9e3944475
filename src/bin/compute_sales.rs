use clap::Parser;
use small_batch::app::runner;
use small_batch::config::SalesArgs;
use small_batch::SalesPipeline;

fn main() {
    let args = SalesArgs::parse();
    args.common.init_logging();
    tracing::info!("🚀 Starting compute_sales");

    let input = &args.common.input;
    let code = match args.settings().and_then(runner::validated).and_then(|settings| {
        // The catalogue is read once here and shared by every TC folder.
        let pipeline = SalesPipeline::from_input(input, settings.catalogue.as_deref())?;
        Ok((settings, pipeline))
    }) {
        Ok((settings, pipeline)) => runner::execute(pipeline, &settings, input),
        Err(e) => runner::report_failure(&e),
    };

    std::process::exit(code);
}
