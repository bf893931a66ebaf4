use randvec::prob::*;
use randvec::fit::*;
use randvec::lab::{self, LabConfig};
use randvec::{io, plot, report};
use structopt::*;
use nalgebra::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use log::info;
use simplelog::{TermLogger, LevelFilter, Config, TerminalMode, ColorChoice};

/// Sample correlated normal and Bernoulli random vectors, estimate their
/// parameters and measure distances between the resulting distributions.
#[derive(StructOpt, Debug)]
struct Opt {

    /// Increase log verbosity (-v info, -vv debug).
    #[structopt(short, long, parse(from_occurrences))]
    verbose : u8,

    #[structopt(subcommand)]
    cmd : Randvec

}

#[derive(StructOpt, Debug)]
enum Randvec {

    /// Runs a full experiment (sampling, estimation, distances), saving the samples
    /// as CSV files and a Markdown report under the output directory.
    Run {

        /// JSON experiment configuration. The built-in default experiment is used if absent.
        #[structopt(short)]
        config : Option<PathBuf>,

        #[structopt(short, default_value = "lab_output")]
        output : PathBuf
    },

    /// Prints the default experiment configuration as JSON.
    Config {

        #[structopt(short)]
        output : Option<PathBuf>
    },

    /// Samples a multivariate normal, writing the realizations as CSV.
    Sample {

        /// Mean vector, as comma-separated entries (e.g. "1,0").
        #[structopt(short)]
        mean : String,

        /// Covariance matrix, as semicolon-separated rows (e.g. "1,0.5;0.5,1").
        #[structopt(short)]
        cov : String,

        #[structopt(short, default_value = "200")]
        n : usize,

        #[structopt(long)]
        seed : Option<u64>,

        /// Use the CLT approximation with the informed number of uniform terms.
        #[structopt(long)]
        clt : Option<usize>,

        #[structopt(short)]
        output : Option<PathBuf>
    },

    /// Estimates mean and covariance of a CSV sample file.
    Estimate {

        src : PathBuf,

        /// Divide by N (maximum likelihood) instead of N-1.
        #[structopt(long)]
        ml : bool
    }

}

fn parse_row(s : &str) -> anyhow::Result<Vec<f64>> {
    s.split(',')
        .map(|e| e.trim().parse::<f64>().map_err(|_| anyhow::Error::msg(format!("Invalid number: '{}'", e)) ) )
        .collect()
}

fn parse_matrix(s : &str) -> anyhow::Result<DMatrix<f64>> {
    let rows = s.split(';').map(parse_row).collect::<anyhow::Result<Vec<_>>>()?;
    lab::rows_to_matrix(&rows)
}

fn init_logger(verbose : u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    init_logger(opt.verbose)?;
    match opt.cmd {
        Randvec::Run { config, output } => {
            let config = match config {
                Some(path) => LabConfig::load_from_path(path)?,
                None => LabConfig::default()
            };
            let out = lab::run(&config)?;
            let data_dir = output.join("data");
            let files = io::save_output(&data_dir, &out)?;
            let plots : Vec<PathBuf> = plot::save_plots(&data_dir, &out)?
                .iter()
                .map(|p| p.strip_prefix(&output).map(Path::to_path_buf).unwrap_or_else(|_| p.clone()) )
                .collect();
            let report_path = output.join("report.md");
            report::save(&report_path, &report::render(&config, &out, &files, &plots)?)?;
            info!("Report saved to {}", report_path.display());
            println!("{}", report_path.display());
        },
        Randvec::Config { output } => {
            let json = LabConfig::default().to_json()?;
            match output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{}", json)
            }
        },
        Randvec::Sample { mean, cov, n, seed, clt, output } => {
            let mu = DVector::from_vec(parse_row(&mean)?);
            let distr = MultiNormal::new(mu, parse_matrix(&cov)?)?;
            let source = clt.map(|k| NormalSource::Clt { k } ).unwrap_or(NormalSource::Direct);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy()
            };
            let y = distr.sample(&mut rng, &source, n)?;
            match output {
                Some(path) => io::write_samples(path, &y)?,
                None => io::write_samples_to(std::io::stdout(), &y)?
            }
        },
        Randvec::Estimate { src, ml } => {
            let y = io::read_samples(&src)?;
            let divisor = if ml { Divisor::MaxLikelihood } else { Divisor::Unbiased };
            let mut estimator = MomentEstimator::new(divisor);
            let est = estimator.fit(&y)?;
            println!("n = {}", est.n);
            println!("mean = {}", est.mean.transpose());
            println!("cov = {}", est.cov);
        }
    }
    Ok(())
}
