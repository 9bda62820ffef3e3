use cfg_if::cfg_if;

/// Turns the avatar URL a browser submits back into the relative media path
/// stored on the profile. The gallery renders URLs like
/// `/uploads/user/avatars/elf%20ranger.png`; stored paths look like
/// `user/avatars/elf ranger.png`.
pub fn normalize_avatar_selection(raw: &str, media_url: &str) -> String {
    let decoded = urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());

    if let Some(idx) = decoded.find(media_url) {
        decoded[idx + media_url.len()..].to_string()
    } else {
        decoded.trim_start_matches('/').to_string()
    }
}

/// Gallery entries are limited to PNG files; that is all the avatar
/// folder holds.
pub fn is_avatar_filename(name: &str) -> bool {
    name.ends_with(".png")
}

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use std::path::{Path, PathBuf};

        /// Media/asset configuration, read once at startup and carried in
        /// `AppState`. Paths of stored images (room photos, avatars, ...) are
        /// kept relative to `media_root` and served under `media_url`.
        #[derive(Clone, Debug)]
        pub struct MediaConfig {
            pub media_root: PathBuf,
            pub media_url: String,
            pub avatar_folder: String,
            pub serve_media: bool,
        }

        impl MediaConfig {
            pub fn from_env() -> Self {
                let media_root = std::env::var("MEDIA_ROOT")
                    .unwrap_or_else(|_| "uploads".to_string());
                let media_url = std::env::var("MEDIA_URL")
                    .unwrap_or_else(|_| "/uploads/".to_string());
                let avatar_folder = std::env::var("AVATAR_FOLDER")
                    .unwrap_or_else(|_| "user/avatars".to_string());
                let serve_media = std::env::var("SERVE_MEDIA")
                    .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                    .unwrap_or(true);

                MediaConfig {
                    media_root: PathBuf::from(media_root),
                    media_url,
                    avatar_folder,
                    serve_media,
                }
            }

            /// Path the media directory is mounted at, without the trailing
            /// slash axum rejects in `nest_service`.
            pub fn mount_path(&self) -> String {
                let trimmed = self.media_url.trim_end_matches('/');
                if trimmed.is_empty() {
                    "/uploads".to_string()
                } else {
                    trimmed.to_string()
                }
            }

            /// Public URL for a stored relative media path.
            pub fn url_for(&self, relative: &str) -> String {
                format!("{}{}", self.media_url, relative.trim_start_matches('/'))
            }

            pub fn avatar_dir(&self) -> PathBuf {
                self.media_root.join(&self.avatar_folder)
            }
        }

        /// The avatar gallery is asset storage, not domain data; views go
        /// through this seam instead of walking the filesystem themselves.
        pub trait AvatarStore: Send + Sync {
            /// Relative media paths of every available avatar image.
            fn list(&self) -> std::io::Result<Vec<String>>;
        }

        pub struct FsAvatarStore {
            dir: PathBuf,
            folder: String,
        }

        impl FsAvatarStore {
            pub fn new(config: &MediaConfig) -> Self {
                FsAvatarStore {
                    dir: config.avatar_dir(),
                    folder: config.avatar_folder.clone(),
                }
            }

            pub fn with_dir(dir: &Path, folder: &str) -> Self {
                FsAvatarStore {
                    dir: dir.to_path_buf(),
                    folder: folder.to_string(),
                }
            }
        }

        impl AvatarStore for FsAvatarStore {
            fn list(&self) -> std::io::Result<Vec<String>> {
                let mut avatars = Vec::new();
                for entry in std::fs::read_dir(&self.dir)? {
                    let entry = entry?;
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    if entry.file_type()?.is_file() && is_avatar_filename(&name) {
                        avatars.push(format!("{}/{}", self.folder, name));
                    }
                }
                avatars.sort();
                Ok(avatars)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_strips_media_prefix() {
        let stored = normalize_avatar_selection("/uploads/user/avatars/wizard.png", "/uploads/");
        assert_eq!(stored, "user/avatars/wizard.png");
    }

    #[test]
    fn selection_decodes_percent_escapes() {
        let stored =
            normalize_avatar_selection("/uploads/user/avatars/elf%20ranger.png", "/uploads/");
        assert_eq!(stored, "user/avatars/elf ranger.png");
    }

    #[test]
    fn selection_with_absolute_url() {
        let stored = normalize_avatar_selection(
            "http://localhost:3000/uploads/user/avatars/user.png",
            "/uploads/",
        );
        assert_eq!(stored, "user/avatars/user.png");
    }

    #[test]
    fn selection_without_prefix_is_kept() {
        let stored = normalize_avatar_selection("user/avatars/user.png", "/uploads/");
        assert_eq!(stored, "user/avatars/user.png");
    }

    #[test]
    fn only_png_files_are_gallery_entries() {
        assert!(is_avatar_filename("user.png"));
        assert!(!is_avatar_filename("user.jpg"));
        assert!(!is_avatar_filename("notes.txt"));
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn fs_store_lists_png_files_sorted() {
        let dir = std::env::temp_dir().join(format!("dicedesk-avatars-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("wizard.png"), b"png").unwrap();
        std::fs::write(dir.join("bard.png"), b"png").unwrap();
        std::fs::write(dir.join("readme.txt"), b"text").unwrap();

        let store = FsAvatarStore::with_dir(&dir, "user/avatars");
        let listed = store.list().unwrap();
        assert_eq!(
            listed,
            vec![
                "user/avatars/bard.png".to_string(),
                "user/avatars/wizard.png".to_string()
            ]
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
