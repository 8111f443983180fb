//! 商品目录命令行客户端
//!
//! 所有命令都经过 `CatalogState`，成功或失败都打印服务端返回的消息。

use anyhow::bail;
use catalog::{
    client::{CatalogState, Outcome, ProductClient},
    config::load_config,
    infrastructure::Logger,
    NewProduct, Product, ProductUpdate,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "catalog", version, about = "商品目录客户端")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// 服务端地址，覆盖配置文件中的 client.base_url
    #[arg(long, env = "CATALOG_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 列出所有商品
    List,
    /// 创建商品
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        image: Option<String>,
    },
    /// 更新商品，只修改提供的字段
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        image: Option<String>,
    },
    /// 删除商品
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
        config.validate()?;
    }
    Logger::init_stderr("warn")?;

    let state = CatalogState::new(ProductClient::new(&config.client)?);

    match cli.command {
        Command::List => {
            let outcome = state.fetch_products().await?;
            report(&outcome)?;
            print_products(&state.products());
        }
        Command::Create { name, price, image } => {
            let outcome = state
                .create_product(&NewProduct { name, price, image })
                .await?;
            report(&outcome)?;
            print_products(&state.products());
        }
        Command::Update {
            id,
            name,
            price,
            image,
        } => {
            let outcome = state
                .update_product(&id, &ProductUpdate { name, price, image })
                .await?;
            report(&outcome)?;
        }
        Command::Delete { id } => {
            let outcome = state.delete_product(&id).await?;
            report(&outcome)?;
        }
    }

    Ok(())
}

fn report(outcome: &Outcome<()>) -> anyhow::Result<()> {
    if !outcome.success {
        bail!(outcome
            .message
            .clone()
            .unwrap_or_else(|| "操作失败".to_string()));
    }
    if let Some(message) = &outcome.message {
        println!("{}", message);
    }
    Ok(())
}

fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }
    for product in products {
        println!(
            "{}  {:<24}  {:>10.2}  {}",
            product.id, product.name, product.price, product.image
        );
    }
}
