use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::path::{Path, PathBuf};

use nx_record_editor::editor::{AutoPresenter, ConsolePresenter, EditSession, Mutator, Presenter, RecordCache};
use nx_record_editor::io::{BinarySerializer, FolderStore, RecordSerializer, RecordStore, StoreKey};
use nx_record_editor::labels::{gift_label, hash_label, static_encounter_label, LabelTable};
use nx_record_editor::randomizer::{randomize_gifts, randomize_static_encounters, randomize_trainers};
use nx_record_editor::records::{
    GiftEncounter, GiftEncounterArchive, PersonalTable, StaticEncounter, StaticEncounterArchive, ThrowParam,
    ThrowParamTable, TrainerData,
};
use nx_record_editor::{
    check_external_library, create_backup, EditorError, PackArchive, RandomizerConfig, SubstitutionEngine,
    OODLE_LIBRARY, SUPPORTED_EXTENSIONS,
};

const PERSONAL_PATH: &str = "bin/pokemon/data/personal_array.bin";
const STATIC_PATH: &str = "bin/field/encount/event_encount.bin";
const GIFT_PATH: &str = "bin/field/encount/poke_add.bin";
const THROW_PARAM_PATH: &str = "bin/misc/throw/throw_param.bin";

#[derive(Parser)]
#[command(name = "nx_record_editor")]
#[command(about = "编辑并随机化打包资源中的游戏记录")]
#[command(version)]
struct Cli {
    /// 静默模式(仅输出错误)
    #[arg(long, global = true)]
    quiet: bool,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 同时写入日志文件
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 列出打包文件中的条目
    List {
        /// 打包文件路径
        #[arg(short, long)]
        pack: PathBuf,
    },
    /// 编辑训练家（每个训练家一个文件，覆盖前逐个备份）
    Trainers {
        /// 训练家数据目录
        #[arg(short, long)]
        dir: PathBuf,

        #[command(flatten)]
        common: EditArgs,
    },
    /// 编辑定点遭遇
    Static {
        #[command(flatten)]
        common: EditArgs,
    },
    /// 编辑赠送遭遇
    Gifts {
        #[command(flatten)]
        common: EditArgs,
    },
    /// 编辑投掷参数
    ThrowParams {
        #[command(flatten)]
        common: EditArgs,
    },
}

#[derive(Args)]
struct EditArgs {
    /// 打包文件路径（同时提供个体数据表）
    #[arg(short, long)]
    pack: PathBuf,

    /// 物种名称表
    #[arg(short, long)]
    names: Option<PathBuf>,

    /// 随机化配置文件(JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 覆盖配置中的随机种子
    #[arg(long)]
    seed: Option<u64>,

    /// 不进入控制台，直接随机化并保存
    #[arg(long)]
    randomize: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    if let Some(dir) = std::env::current_exe()?.parent() {
        check_external_library(dir, OODLE_LIBRARY);
    }

    match &cli.command {
        Command::List { pack } => handle_list(pack),
        Command::Trainers { dir, common } => handle_trainers(dir, common),
        Command::Static { common } => handle_static(common),
        Command::Gifts { common } => handle_gifts(common),
        Command::ThrowParams { common } => handle_throw_params(common),
    }
}

/// 初始化日志（终端 + 可选文件）
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_location_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("无法创建日志文件 {}", path.display()))?;
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

/// 验证打包文件
fn validate_pack(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("打包文件不存在: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());
    if !SUPPORTED_EXTENSIONS.iter().any(|&ext| Some(ext) == extension.as_deref()) {
        bail!("输入文件必须是 {} 文件", SUPPORTED_EXTENSIONS.join("/"));
    }

    Ok(())
}

fn handle_list(path: &Path) -> anyhow::Result<()> {
    validate_pack(path)?;
    let pack = PackArchive::open(path)?;

    println!("{} 个条目:", pack.len());
    for (index, entry) in pack.entries().iter().enumerate() {
        println!(
            "{:>5}  {}  {:>8} bytes{}",
            index,
            hash_label(entry.hash),
            entry.size(),
            if entry.is_compressed() { "  (zlib)" } else { "" }
        );
    }
    Ok(())
}

fn handle_trainers(dir: &Path, args: &EditArgs) -> anyhow::Result<()> {
    let context = EditContext::load(args)?;
    let engine = SubstitutionEngine::new(&context.personal, &context.config.species);
    let mut rng = context.config.rng();
    let policy = &context.config.policy;

    let mut store = FolderStore::open(dir, Some("bin"))?.with_backup();
    let serializer = BinarySerializer::<TrainerData>::new();
    let mut cache = RecordCache::from_whole_store(&mut store, &serializer)?;
    let labels = cache.key_labels();

    let mutator: Mutator<'_, TrainerData> = Box::new(|cache: &mut RecordCache<'_, TrainerData>| {
        randomize_trainers(cache, &engine, policy, &mut rng).map(|_| ())
    });

    with_presenter(args.randomize, |presenter| {
        EditSession::new("Trainers", presenter).run(&mut cache, &labels, Some(mutator))
    })?;
    Ok(())
}

fn handle_static(args: &EditArgs) -> anyhow::Result<()> {
    let mut context = EditContext::load(args)?;
    let settings = context.config.species.without_legendaries();
    let engine = SubstitutionEngine::new(&context.personal, &settings);
    let mut rng = context.config.rng();
    let policy = context.config.policy.clone();
    let names = context.names.clone();

    let mutator: Mutator<'_, StaticEncounter> = Box::new(|cache: &mut RecordCache<'_, StaticEncounter>| {
        randomize_static_encounters(cache, &engine, &policy, &mut rng).map(|_| ())
    });

    let modified = with_presenter(args.randomize, |presenter| {
        EditSession::new("Static Encounters", presenter).edit_table(
            &mut context.pack,
            &StoreKey::path(STATIC_PATH),
            &BinarySerializer::<StaticEncounterArchive>::new(),
            |_, encounter| static_encounter_label(&names, encounter),
            Some(mutator),
        )
    })?;

    context.persist(modified)
}

fn handle_gifts(args: &EditArgs) -> anyhow::Result<()> {
    let mut context = EditContext::load(args)?;
    let settings = context.config.species.without_legendaries();
    let engine = SubstitutionEngine::new(&context.personal, &settings);
    let mut rng = context.config.rng();
    let policy = context.config.policy.clone();
    let names = context.names.clone();

    let mutator: Mutator<'_, GiftEncounter> = Box::new(|cache: &mut RecordCache<'_, GiftEncounter>| {
        randomize_gifts(cache, &engine, &policy, &mut rng).map(|_| ())
    });

    let modified = with_presenter(args.randomize, |presenter| {
        EditSession::new("Gift Encounters", presenter).edit_table(
            &mut context.pack,
            &StoreKey::path(GIFT_PATH),
            &BinarySerializer::<GiftEncounterArchive>::new(),
            |_, gift| gift_label(&names, gift),
            Some(mutator),
        )
    })?;

    context.persist(modified)
}

fn handle_throw_params(args: &EditArgs) -> anyhow::Result<()> {
    if args.randomize {
        bail!("投掷参数不支持随机化");
    }

    let mut context = EditContext::load(args)?;
    let modified = with_presenter(false, |presenter| {
        EditSession::new("Throw Params", presenter).edit_table(
            &mut context.pack,
            &StoreKey::path(THROW_PARAM_PATH),
            &BinarySerializer::<ThrowParamTable>::new(),
            |_, param: &ThrowParam| param.label(),
            None,
        )
    })?;

    context.persist(modified)
}

/// 选择展示层：批处理模式直接执行并保存，否则进入控制台
fn with_presenter<T, R, F>(headless: bool, f: F) -> Result<R, EditorError>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned,
    F: FnOnce(&mut dyn Presenter<T>) -> Result<R, EditorError>,
{
    if headless {
        let mut presenter = AutoPresenter::apply();
        f(&mut presenter)
    } else {
        let stdin = std::io::stdin();
        let mut presenter = ConsolePresenter::new(stdin.lock(), std::io::stdout());
        f(&mut presenter)
    }
}

/// 编辑命令共用的数据
struct EditContext {
    pack_path: PathBuf,
    pack: PackArchive,
    personal: PersonalTable,
    names: LabelTable,
    config: RandomizerConfig,
}

impl EditContext {
    fn load(args: &EditArgs) -> anyhow::Result<Self> {
        validate_pack(&args.pack)?;
        let pack = PackArchive::open(&args.pack)?;

        let personal_bytes = pack
            .get(&StoreKey::path(PERSONAL_PATH))
            .with_context(|| format!("打包文件中缺少个体数据表 {}", PERSONAL_PATH))?;
        let personal = BinarySerializer::<PersonalTable>::new().deserialize(&personal_bytes)?;

        let names = match &args.names {
            Some(path) => LabelTable::load(path)?,
            None => LabelTable::default(),
        };

        let mut config = match &args.config {
            Some(path) => RandomizerConfig::load(path)?,
            None => RandomizerConfig::default(),
        };
        if args.seed.is_some() {
            config.seed = args.seed;
        }
        if let Some(seed) = config.seed {
            log::info!("随机种子: {}", seed);
        }

        Ok(Self { pack_path: args.pack.clone(), pack, personal, names, config })
    }

    /// 修改被保留时先备份，再写回打包文件
    fn persist(&self, modified: bool) -> anyhow::Result<()> {
        if !modified {
            log::info!("没有需要保存的修改");
            return Ok(());
        }

        let backup = create_backup(&self.pack_path)?;
        log::info!("已备份到 {}", backup.display());

        self.pack.write_to_file(&self.pack_path)?;
        log::info!(
            "已写入 {} ({} 个条目被修改)",
            self.pack_path.display(),
            self.pack.modified_count()
        );
        Ok(())
    }
}
