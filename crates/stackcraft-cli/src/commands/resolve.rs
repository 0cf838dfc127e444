//! `stackcraft resolve` — materialize a snapshot and resolve an install
//! plan for one or more targets.

use crate::oracle::{NoopIndex, NoopOracle};
use crate::output::{self, table::Table};
use anyhow::Context;
use serde::Serialize;
use stackcraft_config::ConfigEnv;
use stackcraft_core::{AHashMap, AHashSet, FlagAssignment, PackageName, SnapName, Version};
use stackcraft_repository::{ReqwestHttpClient, SnapshotLoader};
use stackcraft_resolver::{get_tool_map, materialize_cached, resolve_build_plan};
use std::sync::Arc;

#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Snapshot name, e.g. lts-20.14 or nightly-2024-03-05
    #[arg(long)]
    pub snapshot: String,

    /// A target package to resolve; repeatable
    #[arg(long = "target", required = true)]
    pub targets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct InstallEntry {
    name: String,
    version: String,
    flags: Vec<(String, bool)>,
}

pub async fn run(args: &ResolveArgs) -> anyhow::Result<()> {
    let snap_name: SnapName = args
        .snapshot
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid snapshot name {:?}: {e}", args.snapshot))?;

    let config = ConfigEnv::discover()?;
    let client = Arc::new(ReqwestHttpClient::new());
    let loader = SnapshotLoader::new(client, config.clone());

    let spinner = output::progress::Spinner::new(format!("loading {snap_name}"));
    let plan_doc = loader.load_build_plan(&snap_name).await;
    spinner.finish_and_clear();
    let plan_doc = plan_doc.with_context(|| format!("loading snapshot {snap_name}"))?;

    let compiler = plan_doc.system_info.compiler_version.clone();
    let core_packages = plan_doc.system_info.core_packages.clone();
    let user_packages: AHashMap<PackageName, (Version, FlagAssignment)> = plan_doc
        .packages
        .iter()
        .map(|(name, pkg)| {
            (
                name.clone(),
                (pkg.version.clone(), pkg.constraints.flag_overrides.clone()),
            )
        })
        .collect();

    let cache_path = config.mini_build_plan_cache_path(&snap_name, &compiler);
    let mini_plan = materialize_cached(
        &cache_path,
        compiler,
        &core_packages,
        &user_packages,
        &NoopIndex,
        &NoopOracle,
    )?;

    let tool_map = get_tool_map(&mini_plan);

    let mut targets: AHashMap<PackageName, AHashSet<PackageName>> = AHashMap::default();
    for target in &args.targets {
        let name = PackageName::parse(target)
            .ok_or_else(|| anyhow::anyhow!("invalid package name: {target:?}"))?;
        targets.insert(name, AHashSet::default());
    }

    let (to_install, _used_by) = resolve_build_plan(
        &mini_plan,
        &tool_map,
        &|_: &PackageName| false,
        &targets,
        &|_: &PackageName| None,
        config.stack_yaml(),
    )?;

    let mut entries: Vec<InstallEntry> = to_install
        .into_iter()
        .map(|(name, (version, flags))| InstallEntry {
            name: name.to_string(),
            version: version.to_string(),
            flags: flags.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    if output::json::is_enabled() {
        if let Ok(json) = sonic_rs::to_string_pretty(&entries) {
            println!("{json}");
        }
        return Ok(());
    }

    output::header(&format!("install plan for {snap_name}"));
    let mut table = Table::new();
    table.headers(["Package", "Version", "Flags"]);
    for entry in &entries {
        let flags = if entry.flags.is_empty() {
            String::new()
        } else {
            entry
                .flags
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.row([entry.name.as_str(), entry.version.as_str(), flags.as_str()]);
    }
    table.print();
    output::success(&format!("{} package(s) to install", entries.len()));
    Ok(())
}
