use log::error;
use timetable_solver::config::Settings;
use timetable_solver::server;

#[tokio::main]
async fn main() {
    let settings = Settings::from_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&settings.log_filter))
        .init();


    if let Err(e) = server::run_server(&settings).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
