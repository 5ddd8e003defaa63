use prodex_server::ProductServer;

#[derive(clap::Parser)]
struct Args {
    #[arg(long, default_value = "config/prodex.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = <Args as clap::Parser>::parse();

    println!("--------------------------------------------------");
    println!("   Prodex Product Index API");
    println!("   Config:      {}", args.config);
    println!("--------------------------------------------------");

    ProductServer::new().with_config(&args.config).run().await
}
