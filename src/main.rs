//! N42 Proof-of-Stake Engine Demo
//!
//! Drives the engine through both of its paths on an in-memory chain: a
//! producer that prepares, finalizes and seals a few blocks, and a follower
//! that verifies and imports them.
//!
//! Run with: `RUST_LOG=pos=debug cargo run --bin pos-demo -- 3`

use eyre::{bail, eyre, WrapErr};
use n42_pos_engine::{
    dev_genesis, ChainConfig, ConsensusEngine, Header, InMemoryChain, MemoryState, PosEngine,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// Blocks produced when no count is given.
const DEFAULT_BLOCKS: u64 = 3;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing()?;

    let count = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u64>().wrap_err_with(|| format!("invalid block count {arg:?}"))?,
        None => DEFAULT_BLOCKS,
    };

    let engine = PosEngine::default();
    let interval: f64 = engine.rpc_module().call("pos_getBlockInterval", Vec::<()>::new()).await?;
    info!(target: "pos::demo", interval, "Engine started");

    let config = ChainConfig::eip158_from_genesis();
    let producer = InMemoryChain::with_genesis(config, dev_genesis())?;
    let follower = InMemoryChain::with_genesis(config, dev_genesis())?;

    let produced = produce(&engine, &producer, count).await?;

    for header in &produced {
        engine.verify_header(&follower, header, true)?;
        follower.insert_header(header.clone())?;
    }
    info!(target: "pos::demo", imported = produced.len(), "Follower imported blocks");

    // Re-verify the whole batch against the producer's history.
    let (_abort, mut results) = engine.verify_headers(Arc::new(producer), produced, Vec::new());
    let mut verified = 0;
    while let Some(result) = results.recv().await {
        result?;
        verified += 1;
    }
    info!(target: "pos::demo", verified, "Batch verification complete");

    let head = follower.current_header().ok_or_else(|| eyre!("follower has no head"))?;
    println!("head #{} {}", head.number.unwrap_or_default(), head.hash());
    println!("block interval: {interval}s");

    Ok(())
}

/// Produce `count` sealed blocks on top of the chain head.
async fn produce(
    engine: &PosEngine,
    chain: &InMemoryChain,
    count: u64,
) -> eyre::Result<Vec<Header>> {
    let (results_tx, mut results_rx) = mpsc::channel(1);
    let mut state = MemoryState::default();
    let mut produced = Vec::new();

    for _ in 0..count {
        let parent = chain.current_header().ok_or_else(|| eyre!("chain has no head"))?;
        let mut header = Header::child_of(&parent).ok_or_else(|| eyre!("chain height overflow"))?;

        engine.prepare(chain, &mut header)?;
        let block = engine.finalize(chain, &mut header, &mut state, Vec::new(), &[], Vec::new());
        engine.seal(block, results_tx.clone(), CancellationToken::new())?;

        let Some(sealed) = results_rx.recv().await else {
            bail!("sealer exited without a block");
        };
        let hash = chain.insert_header(sealed.header().clone())?;
        info!(target: "pos::demo", number = ?sealed.number(), %hash, "Produced block");
        produced.push(sealed.into_header());
    }

    Ok(produced)
}

fn init_tracing() -> eyre::Result<()> {
    let filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| eyre!(err))
        .wrap_err("failed to install tracing subscriber")
}
