use clap::Parser;
use color_eyre::eyre::{bail, eyre};

use robdd::formula::{BinaryOp, Formula};
use robdd::reference::Ref;
use robdd::robdd::{Robdd, RobddConfig};
use robdd::types::{Lit, Var};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Formula in prefix syntax, e.g. "(AND x1 (NOT x2))".
    #[arg(value_name = "FORMULA")]
    formula: String,

    /// Second formula, combined with the first one via `--op`.
    #[clap(long, value_name = "FORMULA")]
    apply: Option<String>,

    /// Operator for `--apply`: 1 = AND, 2 = OR, 3 = IMPL, 4 = EQUIV.
    #[clap(long, value_name = "INT", default_value = "1")]
    op: u32,

    /// Fix one variable of the result, e.g. "x2=0".
    #[clap(long, value_name = "VAR=0|1")]
    restrict: Option<String>,

    /// List SatCount and AnySat for every node, not only the root.
    #[clap(long)]
    all_nodes: bool,

    /// Print the result in Graphviz DOT format.
    #[clap(long)]
    dot: bool,

    /// Node table size (in bits, so the actual size is `2^size` nodes).
    #[clap(long, value_name = "INT", default_value = "20")]
    storage_bits: usize,

    /// Apply cache size (in bits).
    #[clap(long, value_name = "INT", default_value = "16")]
    cache_bits: usize,
}

fn parse_assignment(input: &str) -> color_eyre::Result<(Var, bool)> {
    let (lhs, rhs) = input
        .split_once('=')
        .ok_or_else(|| eyre!("expected VAR=0|1, got '{}'", input))?;
    let var = match lhs.trim().parse::<Formula>()? {
        Formula::Var(v) => v,
        other => bail!("expected a variable, got '{}'", other),
    };
    let value = match rhs.trim() {
        "0" => false,
        "1" => true,
        other => bail!("expected 0 or 1, got '{}'", other),
    };
    Ok((var, value))
}

fn show_witness(witness: Option<Vec<Lit>>) -> String {
    match witness {
        None => "unsatisfiable".to_string(),
        Some(lits) if lits.is_empty() => "any assignment".to_string(),
        Some(lits) => lits
            .iter()
            .map(|lit| format!("{}={}", lit.var(), lit.value() as u8))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn report(bdd: &Robdd, node: Ref) -> color_eyre::Result<()> {
    println!(
        "node {}: SatCount = {}, AnySat = {}",
        node,
        bdd.sat_count(node)?,
        show_witness(bdd.any_sat(node)?)
    );
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let config = RobddConfig::default()
        .with_storage_bits(args.storage_bits)
        .with_cache_bits(args.cache_bits);
    config.validate()?;

    let formula: Formula = args.formula.parse()?;
    println!("formula = {}", formula);
    let mut bdd = Robdd::from_formula_with_config(&formula, config)?;
    println!("bdd = {:?}", bdd);

    if let Some(input) = &args.apply {
        let op = BinaryOp::try_from(args.op)?;
        let other: Formula = input.parse()?;
        println!("applying {} with {}", op, other);
        let other = Robdd::from_formula_with_config(&other, config)?;
        bdd.apply(&other, op)?;
        let stats = bdd.cache_stats();
        println!("cache hits: {}, misses: {}, entries: {}", stats.hits, stats.misses, stats.entries);
    }

    if let Some(input) = &args.restrict {
        let (var, value) = parse_assignment(input)?;
        let root = bdd.root().ok_or_else(|| eyre!("nothing to restrict"))?;
        println!("restricting {} to {}", var, value as u8);
        let (restricted, _) = bdd.restrict(root, var, value)?;
        bdd = restricted;
    }

    let root = bdd.root().ok_or_else(|| eyre!("no root"))?;
    println!("bdd = {:?}", bdd);
    println!("order = {}", bdd.order());
    print!("{}", bdd.node_table());
    println!("root of size {} = {}", bdd.size(root), bdd.to_bracket_string(root));

    if args.all_nodes {
        for record in bdd.nodes() {
            report(&bdd, record.id)?;
        }
    } else {
        report(&bdd, root)?;
    }

    if args.dot {
        print!("{}", bdd.to_dot(&[root])?);
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
