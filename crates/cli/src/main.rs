mod shell;

use std::io::{self, BufRead, Write};

use anyhow::Context;

use acctlog_infra::{
    AccountCache, AccountService, InMemoryAccountCache, InMemoryStore, NoCache, ServiceConfig,
};

use crate::shell::{Reply, Shell};

fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env();
    acctlog_observability::init_with_filter(&config.log_filter);

    let cache: Box<dyn AccountCache> = if config.cache_enabled {
        Box::new(InMemoryAccountCache::new())
    } else {
        tracing::warn!("account cache disabled; every read goes to the store");
        Box::new(NoCache)
    };

    let shell = Shell::new(AccountService::new(InMemoryStore::new(), cache));
    tracing::info!(cache_enabled = config.cache_enabled, "acctlog shell ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        match shell.handle(&line) {
            None => continue,
            Some(Reply::Quit) => break,
            Some(Reply::Output(value)) => {
                writeln!(stdout, "{value}").context("failed to write to stdout")?;
                stdout.flush().context("failed to flush stdout")?;
            }
        }
    }

    Ok(())
}
