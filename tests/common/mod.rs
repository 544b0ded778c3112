#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Orders fixture exercising every normalizer: cent-mark and comma-decimal
/// prices, EUR conversion, 12-hour and ISO timestamps, null sentinels, an
/// unknown book id, and an unparseable price.
pub const ORDERS_CSV: &str = "\
order_id,user_id,book_id,unit_price,quantity,timestamp,shipping
o1,u1,b1,9¢50,2,2024-03-01T10:00:00,shipped
o2,u2,b2,\"12,50 EUR\",1,03/02/24 01:30:00 p.m.,NULL
o3,u3,b3,$20.00,3,2024-03-02T09:15:00,pending
o4,u1,b9,$5.00,1,2024-03-03T12:00:00,
o5,u3,b3,not-a-price,1,2024-03-04T08:00:00,shipped
";

/// Users fixture: u1/u2 agree on email+phone+name (3 fields), u3 stands
/// alone.
pub const USERS_CSV: &str = "\
id,email,phone,address,name
u1,a@x.com,555,1 Main,A B
u2,a@x.com,555,2 Oak,A B
u3,c@y.com,777,9 Pine,C D
";

/// Catalog fixture with colon-suffixed keys; b1 and b2 carry the same
/// author identity spelled differently.
pub const BOOKS_YAML: &str = r#"
- "id:": b1
  "title:": Dune
  "author:": "Dr. Jane Smith, John Doe"
  "genre:": scifi
  "publisher:": Ace
  "year:": 1965
  "price:": "$9.99"
- "id:": b2
  "title:": Red Mars
  "author:": "john doe, jane smith"
  "genre:": scifi
  "publisher:": Tor
  "year:": 1993
  "price:": "€7.50"
- "id:": b3
  "title:": Notes
  "author:": "Sen. Ada Lovelace"
  "genre:": bio
  "publisher:": Folio
  "year:": 2001
  "price:": "$19.00"
"#;
