/// radar - 3D 世界標記疊加層
///
/// 將世界座標實體投影為螢幕標記，視口外時釘在邊緣，並依靜態屬性分類
use clap::Parser;
use log::error;

mod classifier;
mod cli;
mod config;
mod deep_dungeon;
mod host;
mod overlay;
mod scene;
mod simulation;
mod vector_math;

use cli::{Cli, CliHandler};

#[tokio::main]
async fn main() {
    // 解析命令行參數
    let cli = Cli::parse();

    // 初始化日誌
    CliHandler::init_logger(cli.verbose);

    let mut handler = match CliHandler::new(&cli) {
        Ok(handler) => handler,
        Err(e) => {
            error!("初始化失敗: {:#}", e);
            std::process::exit(1);
        }
    };

    // 處理命令
    if let Err(e) = handler.handle_command(cli).await {
        error!("命令執行失敗: {:#}", e);
        std::process::exit(1);
    }
}
