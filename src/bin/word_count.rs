use clap::Parser;
use small_batch::app::runner;
use small_batch::config::WordCountArgs;
use small_batch::WordCountPipeline;

fn main() {
    let args = WordCountArgs::parse();
    args.common.init_logging();
    tracing::info!("🚀 Starting word_count");

    let code = match args.settings().and_then(runner::validated) {
        Ok(settings) => {
            let pipeline = WordCountPipeline::new(settings.case_sensitive);
            runner::execute(pipeline, &settings, &args.common.input)
        }
        Err(e) => runner::report_failure(&e),
    };

    std::process::exit(code);
}
