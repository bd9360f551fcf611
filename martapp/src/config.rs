use clap::Parser;

#[derive(Debug, Parser)]
pub struct Config {
    #[clap(long, value_name = "MARTAPP_DB_URL", env = "MARTAPP_DB_URL")]
    pub martapp_db_url: String,
    #[clap(
        long,
        value_name = "MARTAPP_LISTEN",
        env = "MARTAPP_LISTEN",
        default_value = "127.0.0.1:3000",
    )]
    pub listen: String,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}
