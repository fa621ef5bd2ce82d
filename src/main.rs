use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
use credseal::{Argon2Params, Cookie, PasswordRecord, SameSite};
use serde_json::json;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 memory cost in KiB (default: 19456)
    #[arg(long = "argon-mem")]
    mem_cost_kib: Option<u32>,

    /// Argon2 time cost / iterations (default: 2)
    #[arg(long = "argon-time")]
    time_cost: Option<u32>,

    /// Argon2 parallelism (default: 1)
    #[arg(long = "argon-parallelism")]
    parallelism: Option<u32>,
}

impl Argon2Args {
    fn to_params(&self) -> Result<Argon2Params> {
        let default = Argon2Params::default();

        Argon2Params::new(
            self.mem_cost_kib.unwrap_or(default.mem_cost_kib()),
            self.time_cost.unwrap_or(default.time_cost()),
            self.parallelism.unwrap_or(default.parallelism()),
        )
        .context("invalid Argon2 parameters")
    }
}

#[derive(Debug, clap::Args)]
struct KeyArgs {
    /// Cookie signing key
    #[arg(long, env = "CREDSEAL_COOKIE_KEY", hide_env_values = true)]
    key: String,
}

impl KeyArgs {
    fn into_key(self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.key.into_bytes())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SameSiteArg {
    Strict,
    Lax,
    None,
}

impl From<SameSiteArg> for SameSite {
    fn from(value: SameSiteArg) -> Self {
        match value {
            SameSiteArg::Strict => SameSite::Strict,
            SameSiteArg::Lax => SameSite::Lax,
            SameSiteArg::None => SameSite::None,
        }
    }
}

#[derive(Debug, clap::Args)]
struct CookieArgs {
    #[arg(long)]
    path: Option<String>,

    #[arg(long)]
    domain: Option<String>,

    /// Lifetime in seconds; 0 leaves Max-Age out, negative expires now
    #[arg(long, allow_negative_numbers = true)]
    max_age: Option<i64>,

    #[arg(long, default_value_t = false)]
    secure: bool,

    #[arg(long, default_value_t = false)]
    http_only: bool,

    #[arg(long, value_enum)]
    same_site: Option<SameSiteArg>,

    /// Print only the encoded value instead of the Set-Cookie line
    #[arg(long, default_value_t = false)]
    value_only: bool,
}

impl CookieArgs {
    fn build(&self, name: &str) -> Cookie {
        let mut cookie = Cookie::new(name, String::new())
            .with_secure(self.secure)
            .with_http_only(self.http_only);
        if let Some(path) = &self.path {
            cookie = cookie.with_path(path.clone());
        }
        if let Some(domain) = &self.domain {
            cookie = cookie.with_domain(domain.clone());
        }
        if let Some(max_age) = self.max_age {
            cookie = cookie.with_max_age(max_age);
        }
        if let Some(same_site) = self.same_site {
            cookie = cookie.with_same_site(same_site.into());
        }
        cookie
    }
}

#[derive(Debug, Parser)]
#[command(name = "credseal")]
#[command(
    version,
    about = "Argon2id password hashes and HMAC-signed cookies from the command line."
)]
struct Cli {
    /// Log debug events to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password read from CREDSEAL_PASSWORD, stdin or the terminal
    Hash {
        #[command(flatten)]
        argon2: Argon2Args,
    },

    /// Verifies a password against an encoded hash; exits 1 on mismatch
    #[command(arg_required_else_help = true)]
    Verify { encoded: String },

    /// Reports whether a hash was made with other parameters; exits 1 if so
    #[command(arg_required_else_help = true)]
    NeedsRehash {
        encoded: String,
        #[command(flatten)]
        argon2: Argon2Args,
    },

    /// Prints the parameters stored in an encoded hash as JSON
    #[command(arg_required_else_help = true)]
    Inspect { encoded: String },

    /// Signs a cookie value
    #[command(arg_required_else_help = true)]
    Sign {
        name: String,
        value: String,
        #[command(flatten)]
        key: KeyArgs,
        #[command(flatten)]
        cookie: CookieArgs,
    },

    /// Verifies a signed cookie value and prints the original value
    #[command(arg_required_else_help = true)]
    Unsign {
        name: String,
        raw: String,
        #[command(flatten)]
        key: KeyArgs,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Hash { argon2 } => {
            let params = argon2.to_params()?;
            let password = auth::read_new_password_with_confirmation()?;
            let encoded = credseal::hash_password_with(password.as_bytes(), &params)
                .context("failed to hash password")?;
            println!("{encoded}");
        }
        Commands::Verify { encoded } => {
            let password = auth::read_password()?;
            let matches = credseal::verify_password(password.as_bytes(), &encoded)
                .context("unable to verify password")?;
            if !matches {
                println!("no-match");
                return Ok(ExitCode::FAILURE);
            }
            println!("match");
        }
        Commands::NeedsRehash { encoded, argon2 } => {
            let params = argon2.to_params()?;
            if credseal::needs_rehash(&encoded, &params)? {
                println!("rehash");
                return Ok(ExitCode::FAILURE);
            }
            println!("current");
        }
        Commands::Inspect { encoded } => {
            let record = PasswordRecord::parse(&encoded)?;
            let info = json!({
                "variant": credseal::password::VARIANT,
                "version": credseal::password::VERSION,
                "params": record.params(),
                "salt_len": record.salt().len(),
                "hash_len": record.hash().len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::Sign {
            name,
            value,
            key,
            cookie,
        } => {
            let key = key.into_key();
            let signed = credseal::write_signed(cookie.build(&name), value.as_bytes(), &key)
                .with_context(|| format!("failed to sign cookie '{name}'"))?;
            if cookie.value_only {
                println!("{}", signed.value());
            } else {
                println!("{signed}");
            }
        }
        Commands::Unsign { name, raw, key } => {
            let key = key.into_key();
            let value = credseal::read_signed(&name, Some(&raw), &key)
                .with_context(|| format!("cookie '{name}' rejected"))?;
            println!("{}", String::from_utf8_lossy(&value));
        }
    }

    Ok(ExitCode::SUCCESS)
}
