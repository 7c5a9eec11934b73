//! Volume subcommands

use std::collections::BTreeMap;
use std::io::Write;

use clap::Args;
use tracing::info;

use crate::domain::volume::{Volume, VolumeRepository};

/// Arguments for the set command
#[derive(Args, Clone, Debug)]
pub struct SetArgs {
    /// Volume name
    #[arg(long)]
    pub name: String,

    /// Ceph pool
    #[arg(long, default_value = "rbd")]
    pub pool: String,

    /// RBD image, defaults to the volume name
    #[arg(long)]
    pub image: Option<String>,

    /// Mapped device path
    #[arg(long, default_value = "")]
    pub device: String,

    /// Host holding the image lock
    #[arg(long, default_value = "")]
    pub locker: String,

    /// Mount path on the host
    #[arg(long, default_value = "")]
    pub mountpoint: String,

    /// Filesystem type
    #[arg(long, default_value = "xfs")]
    pub fstype: String,

    /// Image size in MiB
    #[arg(long, default_value_t = 0)]
    pub size_mb: u64,
}

impl From<SetArgs> for Volume {
    fn from(args: SetArgs) -> Self {
        let image = args.image.unwrap_or_else(|| args.name.clone());

        Volume::new(args.name)
            .with_pool(args.pool)
            .with_image(image)
            .with_device(args.device)
            .with_locker(args.locker)
            .with_mountpoint(args.mountpoint)
            .with_fstype(args.fstype)
            .with_size_mb(args.size_mb)
    }
}

pub async fn get(
    repository: &dyn VolumeRepository,
    name: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let volume = repository.get_volume(name).await?;
    serde_json::to_writer_pretty(&mut *out, &volume)?;
    writeln!(out)?;
    Ok(())
}

pub async fn list(repository: &dyn VolumeRepository, out: &mut impl Write) -> anyhow::Result<()> {
    // Sorted for stable output
    let volumes: BTreeMap<_, _> = repository.get_volumes().await?.into_iter().collect();
    serde_json::to_writer_pretty(&mut *out, &volumes)?;
    writeln!(out)?;
    Ok(())
}

pub async fn set(
    repository: &dyn VolumeRepository,
    args: SetArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let volume = Volume::from(args);
    repository.set_volume(&volume).await?;
    info!(volume = %volume.name, "Volume stored");

    serde_json::to_writer_pretty(&mut *out, &volume)?;
    writeln!(out)?;
    Ok(())
}

pub async fn delete(
    repository: &dyn VolumeRepository,
    name: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    repository.delete_volume(name).await?;
    info!(volume = %name, "Volume deleted");

    writeln!(out, "deleted {}", name)?;
    Ok(())
}
