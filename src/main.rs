mod config;
mod err;
mod http;
mod opt;
mod routes;
mod rules;
mod scheme;
mod server;
mod tcp;
mod template;
mod tls;
mod url;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let opt::Options {
        verbose,
        host,
        port,
        scheme,
        status,
        cert,
        key,
        from,
        to,
    } = clap::Parser::parse();

    env_logger::Builder::new()
        .filter_level(match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .target(env_logger::Target::Stdout)
        .init();

    let (scheme, port) = scheme::resolve(scheme, port)?;
    let rules = rules::Rules::zip(from, to)?;

    server::run(
        server::Config {
            host,
            port,
            cert,
            key,
        },
        routes::State {
            scheme,
            status,
            rules,
        },
    )
    .await?;

    Ok(())
}
