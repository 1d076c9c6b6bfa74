use anyhow::{bail, Context, Result};
use clap::Parser;
use polyarea::algorithms::convex_hull::score;
use polyarea::instance::{write_solution, Instance};
use polyarea::{solver, Params};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::fmt::SubscriberBuilder;

/// Heuristic area-optimal polygonization: compute a simple polygon through
/// every point of an instance with maximal or minimal enclosed area.
#[derive(Parser)]
#[command(name = "polyarea")]
#[command(about = "Heuristic area-optimal polygonization")]
struct Cmd {
  /// `name=value` parameter overrides followed by the instance basename
  /// (extensions are stripped; `<basename>.instance` is read and
  /// `<basename>.<parameters>.solution` is written).
  args: Vec<String>,
}

fn main() -> Result<()> {
  SubscriberBuilder::default().with_target(false).init();
  let started = Instant::now();
  let cmd = Cmd::parse();

  let Some((basename_arg, overrides)) = cmd.args.split_last() else {
    print_usage();
    std::process::exit(2);
  };
  let basename = basename_arg.split('.').next().unwrap_or(basename_arg);

  let mut params = Params::default();
  for pair in overrides {
    apply_override(&mut params, pair)?;
  }

  let instance = Instance::load(format!("{}.instance", basename))?;
  let n = instance.len();
  if n > params.nmax {
    bail!("instance is too large: {} points (nmax={})", n, params.nmax);
  }
  if n < params.nmin {
    bail!("instance is too small: {} points (nmin={})", n, params.nmin);
  }
  info!(basename, n, "started");

  let Some(run) = solver::solve_many(instance.points(), &params, started) else {
    bail!("no solution found");
  };
  let final_score = score(&run.polygon);
  info!(
    seconds = started.elapsed().as_secs_f64(),
    score = final_score,
    "finished"
  );

  let mut comments = vec![
    format!("Score: {}", final_score),
    format!("Time: {}", started.elapsed().as_secs_f64()),
    format!(
      "Parameters: {}",
      std::env::args().collect::<Vec<_>>().join(" ")
    ),
  ];
  if let Some(before) = run.before_opt {
    comments.push(format!("Time before opt: {}", before.seconds));
    comments.push(format!("Score before opt: {}", before.score));
  }

  let out = format!("{}.{}.solution", basename, params.extension());
  write_solution(&out, &run.polygon, &instance, &comments)
    .with_context(|| format!("saving solution to {}", out))?;
  info!(file = out, "wrote solution");
  Ok(())
}

fn print_usage() {
  let d = Params::default();
  eprintln!("usage: polyarea [name=value ...] <instance-basename>");
  eprintln!();
  eprintln!("Reads <basename>.instance and writes <basename>.<parameters>.solution.");
  eprintln!("Parameters and their defaults:");
  eprintln!("  maximize={}   maximize instead of minimize the area", d.maximize);
  eprintln!("  pen={}        inverse weight of the perimeter term (>= 1)", d.pen);
  eprintln!("  hood=2        candidate neighborhood radius in cells, or `inf`");
  eprintln!("  opt={}        refine with local search", d.opt);
  eprintln!("  hops={}        longest path moved by one local-search step", d.hops);
  eprintln!("  multirun={}  restart until the timeout and keep the best", d.multirun);
  eprintln!("  sigma={}       Gaussian noise on the greedy weight", d.sigma);
  eprintln!("  seed={}        random seed", d.seed);
  eprintln!("  timeout={}   seconds before the last multirun restart", d.timeout);
  eprintln!("  nmin={} nmax={}   abort outside these point-count bounds", d.nmin, d.nmax);
}

fn apply_override(params: &mut Params, pair: &str) -> Result<()> {
  let Some((key, value)) = pair.split_once('=') else {
    bail!("expected `name=value`, got `{}`", pair);
  };
  match key {
    "maximize" => params.maximize = parse_bool(key, value)?,
    "opt" => params.opt = parse_bool(key, value)?,
    "multirun" => params.multirun = parse_bool(key, value)?,
    "pen" => {
      let pen: f64 = parse_number(key, value)?;
      if pen < 1.0 {
        bail!("pen must be at least 1, got {}", value);
      }
      params.pen = pen;
    }
    "hood" => {
      params.hood = if value == "inf" {
        None
      } else {
        Some(parse_number(key, value)?)
      };
    }
    "hops" => {
      let hops: u32 = parse_number(key, value)?;
      if hops == 0 {
        bail!("hops must be positive");
      }
      params.hops = hops;
    }
    "sigma" => {
      let sigma: f64 = parse_number(key, value)?;
      if sigma < 0.0 {
        bail!("sigma must be non-negative, got {}", value);
      }
      params.sigma = sigma;
    }
    "seed" => params.seed = parse_number(key, value)?,
    "timeout" => {
      let timeout: f64 = parse_number(key, value)?;
      if timeout <= 0.0 {
        bail!("timeout must be positive, got {}", value);
      }
      params.timeout = timeout;
    }
    "nmin" => params.nmin = parse_number(key, value)?,
    "nmax" => params.nmax = parse_number(key, value)?,
    _ => bail!("unknown parameter `{}`", key),
  }
  Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
  match value.to_ascii_lowercase().as_str() {
    "true" | "1" => Ok(true),
    "false" | "0" => Ok(false),
    _ => bail!("{} expects true or false, got `{}`", key, value),
  }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
  T::Err: std::error::Error + Send + Sync + 'static,
{
  value
    .parse()
    .with_context(|| format!("invalid value for {}: `{}`", key, value))
}
