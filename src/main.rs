use clap::Parser;
use iced::widget::{column, container, horizontal_rule, row, scrollable, text, vertical_rule};
use iced::{Element, Length, Task, Theme};
use log::{error, info, warn};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Duration;

mod catalog;
mod config;
mod error;
mod samples;
mod state;
mod tryon;
mod ui;

use catalog::cache::CatalogCache;
use catalog::thumbnail::ThumbnailSettings;
use catalog::Paginator;
use config::AppConfig;
use state::data::{CatalogPage, Category};
use state::session::Session;
use tryon::client::{generate_try_on, TryOnRequest};
use tryon::upload::{export_result, find_sample_photo, save_uploaded_file};

/// Command-line options; with no flags the window opens
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Virtual try-on for catalog clothing and accessories",
    long_about = None
)]
struct Args {
    /// Download the sample catalog and profile photo, then exit
    #[arg(long, default_value_t = false)]
    download_samples: bool,

    /// Copy the bundled sample images from DIR, then exit
    #[arg(long, value_name = "DIR")]
    copy_samples: Option<PathBuf>,
}

/// Tabs of the item picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Clothing,
    Accessories,
    UploadItem,
}

impl Tab {
    fn category(self) -> Option<Category> {
        match self {
            Tab::Clothing => Some(Category::Clothing),
            Tab::Accessories => Some(Category::Accessory),
            Tab::UploadItem => None,
        }
    }
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    SelectTab(Tab),
    PreviousPage(Category),
    NextPage(Category),
    /// Forget the cached listing and rescan the catalog directory
    RefreshCatalog(Category),
    /// Select or deselect an item by its source path
    ToggleItem(PathBuf),
    RemoveItem(PathBuf),
    PickPhoto,
    UseSamplePhoto,
    PhotoSaved(Result<PathBuf, String>),
    PickCustomItem,
    CustomItemSaved(Result<PathBuf, String>),
    PromptChanged(String),
    Generate,
    Generated(Result<PathBuf, String>),
    /// Copy the generated image somewhere the user picks
    SaveResult,
    ResultSaved(Result<PathBuf, String>),
}

/// Main application state
struct TryOnApp {
    config: AppConfig,
    /// Owns the catalog cache for the lifetime of the app
    paginator: Paginator,
    session: Session,
    tab: Tab,
    clothing: CatalogPage,
    accessories: CatalogPage,
    generating: bool,
    /// Status message to display to the user
    status: String,
}

impl TryOnApp {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let (config, status) = match AppConfig::load() {
            Ok(config) => (config, "Ready.".to_string()),
            Err(e) => {
                error!("❌ {}", e);
                (AppConfig::default(), format!("⚠️  {} (using defaults)", e))
            }
        };

        let thumbnails = ThumbnailSettings {
            max_size: config.thumbnail_max_size,
            output_dir: None,
        };
        let mut cache = CatalogCache::new(config.cache_capacity);
        if let Some(secs) = config.catalog_max_age_secs {
            cache = cache.with_max_age(Duration::from_secs(secs));
        }
        let mut paginator = Paginator::with_cache(cache, thumbnails);

        // Warm the cache and thumbnails so the first page renders quickly
        for category in [Category::Clothing, Category::Accessory] {
            let ready = paginator.preload(&config.catalog_dir(category), category);
            info!("🧥 Preloaded {} {} thumbnails", ready, category);
        }

        let session = Session::default();
        let clothing = paginator.paginate(
            &config.catalog_dir(Category::Clothing),
            Category::Clothing,
            session.page(Category::Clothing),
            config.items_per_page,
        );
        let accessories = paginator.paginate(
            &config.catalog_dir(Category::Accessory),
            Category::Accessory,
            session.page(Category::Accessory),
            config.items_per_page,
        );

        (
            TryOnApp {
                config,
                paginator,
                session,
                tab: Tab::Clothing,
                clothing,
                accessories,
                generating: false,
                status,
            },
            Task::none(),
        )
    }

    /// Re-render the current page of `category` from the cache
    fn refresh_page(&mut self, category: Category, requested: usize) {
        let page = self.paginator.paginate(
            &self.config.catalog_dir(category),
            category,
            requested,
            self.config.items_per_page,
        );
        self.session.set_page(category, page.current_page);
        match category {
            Category::Clothing => self.clothing = page,
            Category::Accessory => self.accessories = page,
        }
    }

    /// Show a native picker for a png/jpg/jpeg file
    fn pick_image(title: &str) -> Option<PathBuf> {
        FileDialog::new()
            .set_title(title)
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectTab(tab) => {
                self.tab = tab;
                if let Some(category) = tab.category() {
                    let page = self.session.page(category);
                    self.refresh_page(category, page);
                }
                Task::none()
            }
            Message::PreviousPage(category) => {
                let page = self.session.page(category).saturating_sub(1);
                self.refresh_page(category, page);
                Task::none()
            }
            Message::NextPage(category) => {
                let page = self.session.page(category) + 1;
                self.refresh_page(category, page);
                Task::none()
            }
            Message::RefreshCatalog(category) => {
                let directory = self.config.catalog_dir(category);
                self.paginator.cache_mut().invalidate(&directory);
                let page = self.session.page(category);
                self.refresh_page(category, page);
                info!(
                    "🔄 Rescanned {} ({} catalogs cached)",
                    directory.display(),
                    self.paginator.cache_mut().len()
                );
                Task::none()
            }
            Message::ToggleItem(path) => {
                self.session.toggle_selection(&path);
                Task::none()
            }
            Message::RemoveItem(path) => {
                self.session.remove_selection(&path);
                Task::none()
            }
            Message::PickPhoto => match Self::pick_image("Upload your photo") {
                Some(path) => {
                    self.status = format!("Uploading {}...", path.display());
                    Task::perform(
                        save_uploaded_file(path, self.config.user_images_dir()),
                        |result| Message::PhotoSaved(result.map_err(|e| e.to_string())),
                    )
                }
                None => Task::none(),
            },
            Message::UseSamplePhoto => {
                match find_sample_photo(&self.config.user_images_dir()) {
                    Some(path) => {
                        info!("Using sample photo {}", path.display());
                        self.session.user_photo = Some(path);
                        self.status = "Using sample photo.".to_string();
                    }
                    None => {
                        self.status =
                            "No sample images found. Please upload an image first.".to_string();
                    }
                }
                Task::none()
            }
            Message::PhotoSaved(result) => {
                match result {
                    Ok(path) => {
                        self.session.user_photo = Some(path);
                        self.status = "✅ Image uploaded successfully!".to_string();
                    }
                    Err(e) => {
                        warn!("⚠️  Photo upload failed: {}", e);
                        self.status = format!("⚠️  Upload failed: {}", e);
                    }
                }
                Task::none()
            }
            Message::PickCustomItem => match Self::pick_image("Upload clothing or accessories") {
                Some(path) => Task::perform(
                    save_uploaded_file(path, self.config.user_items_dir()),
                    |result| Message::CustomItemSaved(result.map_err(|e| e.to_string())),
                ),
                None => Task::none(),
            },
            Message::CustomItemSaved(result) => {
                match result {
                    Ok(path) => {
                        self.session.custom_item = Some(path);
                        self.status = "✅ Item uploaded successfully!".to_string();
                    }
                    Err(e) => {
                        warn!("⚠️  Item upload failed: {}", e);
                        self.status = format!("⚠️  Upload failed: {}", e);
                    }
                }
                Task::none()
            }
            Message::PromptChanged(value) => {
                self.session.prompt_addon = value;
                Task::none()
            }
            Message::Generate => {
                let Some(user_photo) = self.session.user_photo.clone() else {
                    self.status =
                        "Please upload your photo and select at least one item to try on."
                            .to_string();
                    return Task::none();
                };
                if !self.session.can_generate() || self.generating {
                    return Task::none();
                }

                self.generating = true;
                self.status =
                    "Generating your virtual try-on image... this may take a moment.".to_string();

                let request = TryOnRequest {
                    user_photo,
                    items: self.session.selected_items().to_vec(),
                    prompt_addon: self.session.prompt_addon.clone(),
                };
                Task::perform(
                    generate_try_on(
                        self.config.image_gen.clone(),
                        request,
                        self.config.output_dir.clone(),
                    ),
                    |result| Message::Generated(result.map_err(|e| e.to_string())),
                )
            }
            Message::Generated(result) => {
                self.generating = false;
                match result {
                    Ok(path) => {
                        self.status = "✅ Try-on image generated successfully!".to_string();
                        self.session.result = Some(path);
                    }
                    Err(e) => {
                        error!("❌ Error generating try-on image: {}", e);
                        self.status = format!("❌ Error generating try-on image: {}", e);
                    }
                }
                Task::none()
            }
            Message::SaveResult => {
                let Some(result) = self.session.result.clone() else {
                    return Task::none();
                };
                let file_name = result
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| "try_on.png".to_string());
                match FileDialog::new()
                    .set_title("Save try-on image")
                    .set_file_name(file_name)
                    .add_filter("PNG image", &["png"])
                    .save_file()
                {
                    Some(target) => Task::perform(export_result(result, target), |result| {
                        Message::ResultSaved(result.map_err(|e| e.to_string()))
                    }),
                    None => Task::none(),
                }
            }
            Message::ResultSaved(result) => {
                match result {
                    Ok(path) => self.status = format!("✅ Saved image to {}", path.display()),
                    Err(e) => {
                        warn!("⚠️  Saving result failed: {}", e);
                        self.status = format!("⚠️  Could not save image: {}", e);
                    }
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let picker: Element<Message> = match self.tab {
            Tab::Clothing => {
                ui::catalog_view::catalog_tab(&self.clothing, Category::Clothing, &self.session)
            }
            Tab::Accessories => ui::catalog_view::catalog_tab(
                &self.accessories,
                Category::Accessory,
                &self.session,
            ),
            Tab::UploadItem => ui::panels::upload_item_tab(&self.session),
        };

        let main_column = column![
            text("🧥 Virtual Try-On Experience").size(32),
            text("Try on clothing and accessories without leaving your home!").size(16),
            ui::panels::tab_bar(self.tab),
            picker,
            horizontal_rule(1),
            ui::panels::generate_controls(&self.session, self.generating),
        ]
        .spacing(16)
        .padding(16)
        .width(Length::FillPortion(3));

        let content = row![
            ui::panels::sidebar(&self.session, &self.status),
            vertical_rule(1),
            scrollable(main_column).width(Length::FillPortion(3)),
            vertical_rule(1),
            scrollable(ui::panels::result_panel(&self.session)).width(Length::FillPortion(2)),
        ];

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Fill the catalog and photo directories, for `--download-samples` and
/// `--copy-samples`
fn seed_samples(args: &Args) {
    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("⚠️  {} (using defaults)", e);
        AppConfig::default()
    });

    if let Some(source_dir) = &args.copy_samples {
        let copied = samples::copy_samples(source_dir, &config);
        info!("📋 Copied {} sample images from {}", copied, source_dir.display());
    }

    if args.download_samples {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => {
                runtime.block_on(samples::download_samples(&config));
            }
            Err(e) => error!("❌ Could not start runtime for downloads: {}", e),
        }
    }
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.download_samples || args.copy_samples.is_some() {
        seed_samples(&args);
        return Ok(());
    }

    iced::application(
        "Virtual Try-On - AI Powered Fashion",
        TryOnApp::update,
        TryOnApp::view,
    )
    .theme(TryOnApp::theme)
    .centered()
    .run_with(TryOnApp::new)
}
