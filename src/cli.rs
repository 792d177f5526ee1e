use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdftools")]
#[command(about = "Convert PDF pages to JPEG, build a PDF from images, and merge PDFs")]
#[command(version)]
pub struct Cli {
    /// Folder containing pdftoppm (or the Poppler install root). Defaults to PATH
    #[arg(long, global = true, env = "PDFTOOLS_POPPLER_DIR", value_name = "DIR")]
    pub poppler_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive tool menu (default)
    Shell,

    /// Rasterize every page of a PDF to JPEG at 300 DPI
    #[command(alias = "pdf2jpg")]
    PdfToImages {
        /// PDF file to convert
        path: PathBuf,

        /// Keep the intermediate PPM files written by pdftoppm
        #[arg(long)]
        keep_intermediate: bool,
    },

    /// Combine a folder of images into one PDF, ordered by file name
    #[command(alias = "jpg2pdf")]
    ImagesToPdf {
        /// Folder with jpg/jpeg/png/bmp/tif/tiff images
        folder: PathBuf,

        /// Output file (prompted for when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge a folder of PDFs into one, ordered by file name
    #[command(alias = "combine")]
    Merge {
        /// Folder with PDF files
        folder: PathBuf,

        /// Output file (prompted for when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show which pdftoppm would be used
    Check,

    /// Run as MCP server
    Mcp,
}
