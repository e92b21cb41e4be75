use rasterpng::{
  image::Bitmap,
  png::{PngEncoder, PngFilter},
};

fn main() {
  let args: Vec<String> = std::env::args().collect();
  let path = match args.get(1) {
    Some(arg) => std::path::PathBuf::from(arg),
    None => std::env::temp_dir().join("rasterpng_gradient.png"),
  };

  let (width, height) = (256_u32, 256_u32);
  let mut pixels = Vec::with_capacity((width * height) as usize);
  for y in 0..height {
    for x in 0..width {
      let a = 255 - (x / 2 + y / 2).min(255);
      pixels.push(a << 24 | x << 16 | y << 8 | (255 - x));
    }
  }
  let image = Bitmap { width, height, pixels };

  let mut encoder = PngEncoder::new();
  encoder.set_encode_alpha(true);
  encoder.set_filter(PngFilter::Sub);
  encoder.set_dpi(96, 96);

  print!("Writing `{}`... ", path.display());
  let file = match std::fs::File::create(&path) {
    Ok(file) => file,
    Err(e) => {
      println!("{e:?}");
      return;
    }
  };
  match encoder.encode_to_writer(Some(&image), std::io::BufWriter::new(file)) {
    Ok(Some(len)) => println!("wrote {len} bytes."),
    Ok(None) => println!("no image."),
    Err(e) => println!("{e}"),
  }
}
