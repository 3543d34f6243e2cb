use anyhow::Context;
use fsql_balancer::{get_load_balancer, startup};
use fsql_client::conf::{Configuration, MASTER_SERVERS};
use fsql_client::ServerName;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let conf = Configuration::from_env();
    startup::init_tracing(&conf);
    startup::log_process_info();

    run(&conf).map_err(|e| {
        error!("Failed to run: {e:#}");
        e
    })
}

fn run(conf: &Configuration) -> anyhow::Result<()> {
    let servers = parse_servers(conf.get_or(MASTER_SERVERS, ""))?;
    let balancer = get_load_balancer(conf)?;

    info!(
        strategy = balancer.name(),
        servers = servers.len(),
        "master ready"
    );
    match balancer.pick_server(&servers) {
        Some(server) => info!(%server, "first placement target"),
        None => info!("no servers configured yet"),
    }

    Ok(())
}

fn parse_servers(list: &str) -> anyhow::Result<Vec<ServerName>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<ServerName>()
                .with_context(|| format!("invalid entry in {MASTER_SERVERS}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsql_client::conf::MASTER_LOADBALANCER_IMPL;
    use rstest::rstest;

    #[test]
    fn parses_server_list() {
        let servers = parse_servers(" fserver-1:10010, ,[::1]:10011,").unwrap();
        assert_eq!(
            servers,
            vec![
                ServerName::new("fserver-1", 10010),
                ServerName::new("::1", 10011),
            ]
        );
        assert!(parse_servers("").unwrap().is_empty());
    }

    #[rstest]
    #[case("fserver-1")]
    #[case("fserver-1:10010,fserver-2:port")]
    fn malformed_server_list_fails(#[case] list: &str) {
        let err = parse_servers(list).unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid entry in fsql.master.servers"));
    }

    #[rstest]
    #[case(Configuration::new().with(MASTER_SERVERS, "fserver-1"))]
    #[case(Configuration::new().with(MASTER_LOADBALANCER_IMPL, "missing"))]
    fn run_reports_startup_failures(#[case] conf: Configuration) {
        assert!(run(&conf).is_err());
    }

    #[test]
    fn run_succeeds_with_defaults() {
        let conf = Configuration::new().with(MASTER_SERVERS, "a:1,b:2");
        run(&conf).unwrap();
    }
}
