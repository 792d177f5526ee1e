use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::commands::images_to_pdf::ImagesToPdf;
use crate::commands::merge::MergePdfs;
use crate::commands::pdf_to_images::PdfToImages;
use crate::config::Config;
use crate::raster::Origin;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfToImagesRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Folder containing pdftoppm; overrides the server's setting")]
    #[serde(default)]
    pub poppler_dir: Option<String>,
    #[schemars(description = "Keep the intermediate PPM files (default: false)")]
    #[serde(default)]
    pub keep_intermediate: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FolderRequest {
    #[schemars(description = "Folder to read, non-recursively")]
    pub folder: String,
    #[schemars(description = "Output PDF path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LocateRequest {
    #[schemars(description = "Folder containing pdftoppm; overrides the server's setting")]
    #[serde(default)]
    pub poppler_dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PdfToolsServer {
    config: Config,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PdfToolsServer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            tool_router: Self::tool_router(),
        }
    }

    /// A blank per-request directory falls back to the server's own.
    fn config_for(&self, poppler_dir: Option<String>) -> Config {
        match poppler_dir.filter(|dir| !dir.trim().is_empty()) {
            Some(dir) => Config::new(Some(PathBuf::from(dir))),
            None => self.config.clone(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {}", e))
}

#[tool_router]
impl PdfToolsServer {
    #[tool(description = "Rasterize every page of a PDF at 300 DPI and save them as JPEG files named '<name>[<page>].jpeg' in a '<name>_images' folder next to the PDF. Requires Poppler's pdftoppm.")]
    fn pdf_to_images(&self, Parameters(req): Parameters<PdfToImagesRequest>) -> String {
        let config = self.config_for(req.poppler_dir);
        let job = match PdfToImages::prepare(&req.path, &config) {
            Ok(job) => job,
            Err(e) => return format!("Error: {}", e),
        };
        match job.run(req.keep_intermediate) {
            Ok(report) => to_json(&report),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Combine all jpg/jpeg/png/bmp/tif/tiff images in a folder into one PDF, one page per image, ordered by file name (case-insensitive)")]
    fn images_to_pdf(&self, Parameters(req): Parameters<FolderRequest>) -> String {
        let job = match ImagesToPdf::prepare(&req.folder) {
            Ok(job) => job,
            Err(e) => return format!("Error: {}", e),
        };
        match job.run(&req.output) {
            Ok(report) => to_json(&report),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Merge all PDFs in a folder into one, in file name order (case-insensitive)")]
    fn merge_pdfs(&self, Parameters(req): Parameters<FolderRequest>) -> String {
        let job = match MergePdfs::prepare(&req.folder) {
            Ok(job) => job,
            Err(e) => return format!("Error: {}", e),
        };
        match job.run(&req.output) {
            Ok(report) => to_json(&report),
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Report which pdftoppm executable would be used for rasterizing")]
    fn locate_rasterizer(&self, Parameters(req): Parameters<LocateRequest>) -> String {
        let config = self.config_for(req.poppler_dir);
        match config.rasterizer() {
            Some(rasterizer) => {
                let result = LocateResult {
                    program: rasterizer.program().display().to_string(),
                    from_override: matches!(rasterizer.origin(), Origin::Override(_)),
                };
                to_json(&result)
            }
            None => format!("Error: {}", crate::config::missing_rasterizer_help()),
        }
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LocateResult {
    pub program: String,
    pub from_override: bool,
}

impl ServerHandler for PdfToolsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF conversion tools. Use pdf_to_images to rasterize a PDF to JPEG pages, \
                 images_to_pdf to build a PDF from a folder of images, merge_pdfs to combine \
                 a folder of PDFs, and locate_rasterizer to check the Poppler setup."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let server = PdfToolsServer::new(config);

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
