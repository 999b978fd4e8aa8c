use anyhow::Result;
use certkey_cli::{cli::CertArgs, init_tracing};

fn main() -> Result<()> {
    init_tracing();
    let config = CertArgs::parse_config();
    config.run(std::io::stdout().lock())
}
