use zoclaw::Dispatcher;
use zoclaw::command::EXIT_FAILURE;

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_env(env_logger::Env::default())
        .init();

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let code = match Dispatcher::from_process().run(&args) {
        Ok(code) => code,
        Err(err) => {
            log::error!("{err:#}");
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}
