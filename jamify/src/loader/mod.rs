pub mod gif_loader;
