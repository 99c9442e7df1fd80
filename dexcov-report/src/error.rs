use std::path::PathBuf;

error_chain! {
    links {
        Dexcov(::dexcov::error::Error, ::dexcov::error::ErrorKind);
    }

    foreign_links {
        Io(::std::io::Error);
        Json(::serde_json::Error);
    }

    errors {
        NoClassListing {
            description("no class listing, please specify one via --classes <FILE>")
        }

        NoCoverageData {
            description("no coverage data, please specify some via --cov <FILE>, --covlist <FILE> or --moni <DIR>")
        }

        NotAFile(path: PathBuf) {
            description("not a regular file")
            display("not a regular file: {}", path.display())
        }

        NotADirectory(path: PathBuf) {
            description("no such directory")
            display("no such directory: {}", path.display())
        }

        MalformedList(path: PathBuf, line: usize) {
            description("malformed coverage list")
            display("malformed coverage list {} at line {}", path.display(), line)
        }
    }
}
