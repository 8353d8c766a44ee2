use divan::AllocProfiler;

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

#[path = "../tests/common/mod.rs"]
mod common;

fn main() {
    divan::main();
}

pub mod read {
    use std::path::PathBuf;

    use bsa::Archive;
    use divan::Bencher;
    use tempfile::TempDir;

    use crate::common::{build_le, write_archive, TestFormat};

    fn get_input() -> (TempDir, PathBuf) {
        let contents = (0..4096).map(|i| (i % 97) as u8).collect::<Vec<_>>();
        let names = (0..256)
            .map(|i| format!("meshes\\set{}\\part{i}.nif", i % 8))
            .collect::<Vec<_>>();
        let members = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), contents.as_slice(), i % 2 == 0))
            .collect::<Vec<_>>();

        let dir = tempfile::tempdir().unwrap();
        let path = write_archive(dir.path(), "bench.bsa", &build_le(&members));
        (dir, path)
    }

    fn opened() -> (TempDir, Archive<TestFormat>) {
        let (dir, path) = get_input();
        let mut archive = Archive::new(&path, TestFormat).unwrap();
        archive.open().unwrap();
        (dir, archive)
    }

    #[divan::bench]
    fn open(bencher: Bencher) {
        bencher.with_inputs(get_input).bench_refs(|(_, path)| {
            let mut archive = Archive::new(&*path, TestFormat).unwrap();
            archive.open().unwrap();
            divan::black_box(archive);
        });
    }

    #[divan::bench]
    fn lookup(bencher: Bencher) {
        let (_dir, archive) = opened();
        bencher.bench_local(|| {
            divan::black_box(archive.get_entry("MESHES\\SET3\\PART131.NIF").unwrap());
        });
    }

    #[divan::bench(sample_count = 1)]
    fn extract_all(bencher: Bencher) {
        let (_dir, archive) = opened();
        bencher.bench_local(move || {
            for entry in archive.entries().unwrap() {
                divan::black_box(archive.extract(entry).unwrap());
            }
        });
    }
}
