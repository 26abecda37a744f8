use web::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[actix_web::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("web".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let configuration = get_configuration()?;
    let app = Application::build(configuration.clone()).await?;
    let application_task = tokio::spawn(app.run_until_stopped());

    tokio::select! {
        outcome = application_task => report_exit("API", outcome),
    };

    Ok(())
}

fn report_exit(
    task_name: &str,
    outcome: Result<Result<(), std::io::Error>, tokio::task::JoinError>,
) {
    match outcome {
        Ok(Ok(())) => tracing::info!("{} has exited", task_name),
        Ok(Err(e)) => tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "{} failed",
            task_name
        ),
        Err(e) => tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "{} task failed to complete",
            task_name
        ),
    }
}
