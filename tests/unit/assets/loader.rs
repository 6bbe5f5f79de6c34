use std::io::Cursor;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "scrollreel_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, rgba: [u8; 4]) {
    let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

fn ticket(i: u32) -> LoadTicket {
    LoadTicket {
        generation: LoadGeneration(1),
        index: FrameIndex(i),
    }
}

#[test]
fn loads_and_decodes_from_root() {
    let tmp = temp_dir("fs_loader_ok");
    std::fs::create_dir_all(tmp.join("frames")).unwrap();
    write_png(&tmp.join("frames/f_0.png"), [9, 8, 7, 255]);

    let mut loader = FsFrameLoader::new(&tmp);
    let locator = crate::assets::locator::NameTemplate::new("frames/f_", "png")
        .unwrap()
        .render(FrameIndex(0), 1);
    loader.request(ticket(0), &locator);

    let done = loader.next_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(done.ticket, ticket(0));
    let frame = done.outcome.unwrap();
    assert_eq!((frame.width, frame.height), (1, 1));
    assert_eq!(frame.rgba8_premul.as_slice(), &[9, 8, 7, 255]);
    assert_eq!(loader.requested(), 1);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_file_completes_as_failure() {
    let tmp = temp_dir("fs_loader_missing");
    std::fs::create_dir_all(&tmp).unwrap();

    let mut loader = FsFrameLoader::new(&tmp);
    let locator = crate::assets::locator::NameTemplate::new("f_", "png")
        .unwrap()
        .render(FrameIndex(3), 1);
    loader.request(ticket(3), &locator);

    let done = loader.next_timeout(Duration::from_secs(10)).unwrap();
    assert_eq!(done.ticket.index, FrameIndex(3));
    assert!(matches!(done.outcome, Err(ReelError::Asset(_))));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn empty_channel_reports_nothing() {
    let loader = FsFrameLoader::new("unused");
    assert!(loader.try_next().is_none());
    assert!(loader.next_timeout(Duration::from_millis(1)).is_err());
}
