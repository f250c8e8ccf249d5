crate::record! {
    /// Per-node virtual memory counters from
    /// `/sys/devices/system/node/node<N>/vmstat`.
    pub struct NodeVmStat {
        NrFreePages => nr_free_pages,
        NrZoneInactiveAnon => nr_zone_inactive_anon,
        NrZoneActiveAnon => nr_zone_active_anon,
        NrZoneInactiveFile => nr_zone_inactive_file,
        NrZoneActiveFile => nr_zone_active_file,
        NrZoneUnevictable => nr_zone_unevictable,
        NrZoneWritePending => nr_zone_write_pending,
        NrMlock => nr_mlock,
        NrPageTablePages => nr_page_table_pages,
        NrKernelStack => nr_kernel_stack,
        NrBounce => nr_bounce,
        NrFreeCma => nr_free_cma,
        NumaHit => numa_hit,
        NumaMiss => numa_miss,
        NumaForeign => numa_foreign,
        NumaInterleave => numa_interleave,
        NumaLocal => numa_local,
        NumaOther => numa_other,
        NrInactiveAnon => nr_inactive_anon,
        NrActiveAnon => nr_active_anon,
        NrInactiveFile => nr_inactive_file,
        NrActiveFile => nr_active_file,
        NrUnevictable => nr_unevictable,
        NrSlabReclaimable => nr_slab_reclaimable,
        NrSlabUnreclaimable => nr_slab_unreclaimable,
        NrIsolatedAnon => nr_isolated_anon,
        NrIsolatedFile => nr_isolated_file,
        WorkingsetNodes => workingset_nodes,
        WorkingsetRefault => workingset_refault,
        WorkingsetActivate => workingset_activate,
        WorkingsetRestore => workingset_restore,
        WorkingsetNodereclaim => workingset_nodereclaim,
        NrAnonPages => nr_anon_pages,
        NrMapped => nr_mapped,
        NrFilePages => nr_file_pages,
        NrDirty => nr_dirty,
        NrWriteback => nr_writeback,
        NrWritebackTemp => nr_writeback_temp,
        NrShmem => nr_shmem,
        NrShmemHugepages => nr_shmem_hugepages,
        NrShmemPmdmapped => nr_shmem_pmdmapped,
        NrFileHugepages => nr_file_hugepages,
        NrFilePmdmapped => nr_file_pmdmapped,
        NrAnonTransparentHugepages => nr_anon_transparent_hugepages,
        NrUnstable => nr_unstable,
        NrVmscanWrite => nr_vmscan_write,
        NrVmscanImmediateReclaim => nr_vmscan_immediate_reclaim,
        NrDirtied => nr_dirtied,
        NrWritten => nr_written,
        NrKernelMiscReclaimable => nr_kernel_misc_reclaimable,
    }
}
