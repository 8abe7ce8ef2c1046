use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use xshell::{Shell, cmd};

/// NMH 清单的注册名称，浏览器扩展按这个名字连接宿主
const NMH_NAME: &str = "net.nitroshare.nmh";

/// NMH 二进制的安装位置
const NMH_BIN: &str = "/usr/local/bin/nitroshell-nmh";

// TODO: 扩展上架后把发布版 Chrome 扩展 ID 填进来
const CHROME_EXTENSION_ID: &str = "EXTENSION_ID";
const FIREFOX_EXTENSION_ID: &str = "nitroshare@nitroshare.net";

#[derive(Parser)]
#[command(name = "xtask", about = "Nitroshell 开发任务自动化")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 构建所有组件 (release)
    Build,
    /// 安装二进制和浏览器 NMH 清单
    Install,
    /// 卸载
    Uninstall,
    /// 运行测试
    Test,
    /// 清理构建产物
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    // 确保在项目根目录执行
    let project_root = std::env::var("CARGO_MANIFEST_DIR")
        .map(std::path::PathBuf::from)
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::env::current_dir().unwrap());
    sh.change_dir(&project_root);

    match cli.command {
        Commands::Build => build(&sh)?,
        Commands::Install => install(&sh)?,
        Commands::Uninstall => uninstall(&sh)?,
        Commands::Test => test(&sh)?,
        Commands::Clean => clean(&sh)?,
    }

    Ok(())
}

fn build(sh: &Shell) -> Result<()> {
    println!("🔨 构建所有组件...");
    cmd!(
        sh,
        "cargo build --release -p nitroshell-cli -p nitroshell-nmh"
    )
    .run()?;
    println!("✅ 构建完成");
    Ok(())
}

fn install(sh: &Shell) -> Result<()> {
    println!("📦 安装 Nitroshell...");

    build(sh)?;

    // 复制二进制文件
    println!("📋 复制二进制文件...");
    cmd!(
        sh,
        "sudo cp target/release/nitroshell-cli /usr/local/bin/nitroshell"
    )
    .run()?;
    cmd!(sh, "sudo cp target/release/nitroshell-nmh {NMH_BIN}").run()?;

    // 写入浏览器 NMH 清单 (用户级目录，无需 sudo)
    println!("🌐 写入浏览器 NMH 清单...");
    install_nmh_manifests()?;

    println!("✅ 安装完成");
    println!("   使用 'nitroshell --help' 查看命令");
    println!("   浏览器扩展重启后即可连接到 {}", NMH_NAME);
    Ok(())
}

fn uninstall(sh: &Shell) -> Result<()> {
    println!("🗑️  卸载 Nitroshell...");

    let _ = cmd!(sh, "sudo rm /usr/local/bin/nitroshell").run();
    let _ = cmd!(sh, "sudo rm {NMH_BIN}").run();

    for path in manifest_paths()? {
        let _ = std::fs::remove_file(&path);
    }

    println!("✅ 卸载完成");
    Ok(())
}

fn test(sh: &Shell) -> Result<()> {
    println!("🧪 运行测试...");
    cmd!(sh, "cargo test --workspace").run()?;
    println!("✅ 测试完成");
    Ok(())
}

fn clean(sh: &Shell) -> Result<()> {
    println!("🧹 清理构建产物...");
    cmd!(sh, "cargo clean").run()?;
    println!("✅ 清理完成");
    Ok(())
}

/// 各浏览器的用户级 NMH 清单路径
fn manifest_paths() -> Result<Vec<std::path::PathBuf>> {
    let home = dirs::home_dir().context("无法确定主目录")?;
    Ok(vec![
        home.join(".config/google-chrome/NativeMessagingHosts")
            .join(format!("{NMH_NAME}.json")),
        home.join(".config/chromium/NativeMessagingHosts")
            .join(format!("{NMH_NAME}.json")),
        home.join(".mozilla/native-messaging-hosts")
            .join(format!("{NMH_NAME}.json")),
    ])
}

fn install_nmh_manifests() -> Result<()> {
    let chrome_manifest = json!({
        "name": NMH_NAME,
        "description": "NitroShare native messaging host",
        "path": NMH_BIN,
        "type": "stdio",
        "allowed_origins": [format!("chrome-extension://{CHROME_EXTENSION_ID}/")],
    });
    let firefox_manifest = json!({
        "name": NMH_NAME,
        "description": "NitroShare native messaging host",
        "path": NMH_BIN,
        "type": "stdio",
        "allowed_extensions": [FIREFOX_EXTENSION_ID],
    });

    for path in manifest_paths()? {
        let manifest = if path.to_string_lossy().contains(".mozilla") {
            &firefox_manifest
        } else {
            &chrome_manifest
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(manifest)?)?;
        println!("   {}", path.display());
    }

    Ok(())
}
