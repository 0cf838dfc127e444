//! Random data generators for property-based and fuzz-adjacent testing.
//!
//! Package/flag names, dotted versions, and a small dependency-graph
//! generator that produces a `MiniPlan`-shaped structure for exercising
//! the resolver without hand-writing every fixture.

use rand::Rng;
use rand::seq::SliceRandom;
use stackcraft_core::{AHashMap, AHashSet, FlagAssignment, FlagName, PackageName, Version};
use stackcraft_resolver::{MiniPackageInfo, MiniPlan};

const NAME_SYLLABLES: &[&str] = &[
    "aes", "text", "bytes", "con", "duit", "yaml", "http", "client", "serv", "ant", "warp", "wai",
    "lens", "mtl", "stm", "vector", "hash", "able", "time", "parsec",
];

/// A random package name built from two or three syllables joined by
/// `-`, guaranteed to satisfy `PackageName::parse`.
#[must_use]
pub fn random_package_name(rng: &mut impl Rng) -> PackageName {
    let parts = rng.gen_range(1..=3);
    let name = (0..parts)
        .map(|_| *NAME_SYLLABLES.choose(rng).expect("non-empty syllable list"))
        .collect::<Vec<_>>()
        .join("-");
    PackageName::parse(&name).unwrap_or_else(|| PackageName::new_unchecked(name))
}

/// A random dotted version with 2-4 components.
#[must_use]
pub fn random_version(rng: &mut impl Rng) -> Version {
    let len = rng.gen_range(2..=4);
    let components: Vec<u64> = (0..len).map(|_| rng.gen_range(0..=20)).collect();
    Version::new(components)
}

/// A random flag name.
#[must_use]
pub fn random_flag_name(rng: &mut impl Rng) -> FlagName {
    const FLAGS: &[&str] = &["system-libyaml", "systemlib", "network-uri", "developer", "examples"];
    FlagName::new(*FLAGS.choose(rng).expect("non-empty flag list"))
}

/// A random flag assignment over 0-3 distinct flags.
#[must_use]
pub fn random_flag_assignment(rng: &mut impl Rng) -> FlagAssignment {
    let mut assignment = FlagAssignment::new();
    let count = rng.gen_range(0..=3);
    for _ in 0..count {
        assignment.insert(random_flag_name(rng), rng.r#gen());
    }
    assignment
}

/// Configuration for a generated dependency graph.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub package_count: usize,
    /// Maximum number of dependencies per package.
    pub max_deps: usize,
    /// Fraction (0.0-1.0) of packages that expose an executable.
    pub exe_fraction: f64,
}

impl GraphConfig {
    /// A small, conflict-free linear-ish graph for smoke tests.
    #[must_use]
    pub fn simple() -> Self {
        Self { package_count: 8, max_deps: 2, exe_fraction: 0.0 }
    }

    /// A denser graph with shared dependencies (diamonds), still acyclic.
    #[must_use]
    pub fn complex() -> Self {
        Self { package_count: 40, max_deps: 5, exe_fraction: 0.1 }
    }

    /// A large graph for stress-testing the flag selector's bounded
    /// search and the target resolver's closure computation.
    #[must_use]
    pub fn stress() -> Self {
        Self { package_count: 500, max_deps: 8, exe_fraction: 0.05 }
    }
}

/// A generated `MiniPlan` plus the names it contains, in topological
/// order (index `i` only depends on indices `< i`), so the graph is
/// acyclic by construction.
#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    pub plan: MiniPlan,
    pub names: Vec<PackageName>,
}

/// Build a random acyclic dependency graph as a `MiniPlan` under a fixed
/// compiler, with no core packages (every package is user-land).
#[must_use]
pub fn generate_graph(rng: &mut impl Rng, config: &GraphConfig) -> GeneratedGraph {
    let compiler = "ghc-9.4.7".parse().expect("valid compiler literal");
    let mut plan = MiniPlan::new(compiler);
    let mut names = Vec::with_capacity(config.package_count);

    for i in 0..config.package_count {
        let mut name = random_package_name(rng);
        while names.contains(&name) {
            name = random_package_name(rng);
        }

        let dep_count = if i == 0 { 0 } else { rng.gen_range(0..=config.max_deps.min(i)) };
        let package_deps: AHashSet<PackageName> =
            names[..i].choose_multiple(rng, dep_count).cloned().collect();

        let has_exe = rng.gen_bool(config.exe_fraction);
        let exes: AHashSet<std::sync::Arc<str>> = if has_exe {
            AHashSet::from_iter([std::sync::Arc::from(format!("{name}-exe").as_str())])
        } else {
            AHashSet::default()
        };

        plan.packages.insert(
            name.clone(),
            MiniPackageInfo {
                version: random_version(rng),
                flags: random_flag_assignment(rng),
                package_deps,
                tool_deps: AHashSet::default(),
                exes,
                has_library: true,
            },
        );
        names.push(name);
    }

    GeneratedGraph { plan, names }
}

/// Build a graph and introduce a dependency cycle between two packages,
/// for exercising the shadow projector's and target resolver's cycle
/// detection.
#[must_use]
pub fn generate_graph_with_cycle(rng: &mut impl Rng, config: &GraphConfig) -> GeneratedGraph {
    let mut graph = generate_graph(rng, config);
    if graph.names.len() < 2 {
        return graph;
    }
    let a = graph.names[graph.names.len() - 2].clone();
    let b = graph.names[graph.names.len() - 1].clone();
    if let Some(info) = graph.plan.packages.get_mut(&a) {
        info.package_deps.insert(b.clone());
    }
    if let Some(info) = graph.plan.packages.get_mut(&b) {
        info.package_deps.insert(a);
    }
    graph
}

/// A core-package map with `count` entries, each at a small fixed
/// version, drawn from the given plan's package names (for constructing
/// a consistent compiler-wired-in set in tests).
#[must_use]
pub fn random_core_subset(
    rng: &mut impl Rng,
    graph: &GeneratedGraph,
    count: usize,
) -> AHashMap<PackageName, Version> {
    graph
        .names
        .choose_multiple(rng, count.min(graph.names.len()))
        .map(|name| (name.clone(), graph.plan.packages[name].version.clone()))
        .collect()
}
