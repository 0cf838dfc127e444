//! `stackcraft pick-snapshot` — classify candidate snapshots against a
//! set of local packages, reporting ok/partial/fail per candidate.

use crate::oracle::{NoopIndex, NoopOracle};
use crate::output::{self, table::Table};
use stackcraft_config::ConfigEnv;
use stackcraft_core::{AHashMap, FlagAssignment, PackageIdentifier, PackageName, SnapName, Version};
use stackcraft_repository::{ReqwestHttpClient, SnapshotLoader};
use stackcraft_resolver::{
    BuildPlanCheck, LocalPackageDescription, SnapshotCandidate, check_snap_build_plan, materialize_cached,
};
use std::sync::Arc;

#[derive(clap::Args, Debug, Clone)]
pub struct PickSnapshotArgs {
    /// Local packages to satisfy, given as NAME-VERSION (e.g. myapp-1.0)
    #[arg(required = true)]
    pub locals: Vec<String>,

    /// A candidate snapshot to classify; repeatable
    #[arg(long = "candidate", required = true)]
    pub candidates: Vec<String>,
}

fn parse_local(s: &str) -> anyhow::Result<LocalPackageDescription> {
    let (name, version) = s
        .rsplit_once('-')
        .ok_or_else(|| anyhow::anyhow!("expected NAME-VERSION, got {s:?}"))?;
    let name =
        PackageName::parse(name).ok_or_else(|| anyhow::anyhow!("invalid package name in {s:?}"))?;
    let version =
        Version::parse(version).ok_or_else(|| anyhow::anyhow!("invalid version in {s:?}"))?;
    Ok(LocalPackageDescription {
        identifier: PackageIdentifier::new(name, version),
        flag_specs: vec![],
    })
}

pub async fn run(args: &PickSnapshotArgs) -> anyhow::Result<()> {
    let locals: Vec<LocalPackageDescription> =
        args.locals.iter().map(|s| parse_local(s)).collect::<anyhow::Result<_>>()?;

    let config = ConfigEnv::discover()?;
    let client = Arc::new(ReqwestHttpClient::new());
    let loader = SnapshotLoader::new(client, config.clone());

    let mut candidates: Vec<SnapshotCandidate<String>> = Vec::with_capacity(args.candidates.len());
    for candidate in &args.candidates {
        let snap_name: SnapName = candidate
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid snapshot name {candidate:?}: {e}"))?;
        let plan_doc = loader.load_build_plan(&snap_name).await?;
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
            compiler.clone(),
            &core_packages,
            &user_packages,
            &NoopIndex,
            &NoopOracle,
        )?;
        let pool: AHashMap<PackageName, Version> = mini_plan
            .packages
            .iter()
            .map(|(name, info)| (name.clone(), info.version.clone()))
            .collect();
        candidates.push(SnapshotCandidate { id: candidate.clone(), pool, compiler });
    }

    let mut table = Table::new();
    table.headers(["Snapshot", "Status", "Errors"]);
    let mut any_ok = false;
    for candidate in &candidates {
        let check =
            check_snap_build_plan(&locals, &candidate.pool, &candidate.compiler, None, &NoopOracle)?;
        let (status, errors) = match &check {
            BuildPlanCheck::Ok(_) => {
                any_ok = true;
                ("ok", 0)
            }
            BuildPlanCheck::Partial(_, errs) => ("partial", errs.len()),
            BuildPlanCheck::Fail(..) => ("fail", 0),
        };
        let status_cell = match status {
            "ok" => table.success_cell(status),
            "partial" => table.warning_cell(status),
            _ => table.error_cell(status),
        };
        let errors_cell = table.right_cell(errors);
        let name_cell = comfy_table::Cell::new(&candidate.id);
        table.styled_row(vec![name_cell, status_cell, errors_cell]);
    }
    table.print();

    if any_ok {
        output::success("at least one candidate snapshot satisfies all local packages");
    } else {
        output::warning("no candidate snapshot fully satisfies the local packages");
    }
    Ok(())
}
