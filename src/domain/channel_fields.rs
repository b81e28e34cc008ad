// ==========================================
// 板卡选型优化系统 - 通道计数字段表
// ==========================================
// 职责: 39 个通道计数字段的全局固定顺序
// 红线: 顺序为兼容性契约，不得从目录模式动态推导
// ==========================================

/// 通道计数字段的固定顺序（39 个）
///
/// 需求向量与板卡通道矩阵均按此顺序排列。
pub const CHANNEL_COUNT_FIELDS: [&str; 39] = [
    "AD_channel_count_single_ended",
    "AD_channel_count_differential",
    "DA_channel_count",
    "DIO_total_channel_count",
    "DI_channel_count",
    "DO_channel_count",
    "PWM_output_channel_count",
    "Encoder_quadrature_channel_count",
    "Encoder_hall_channel_count",
    "Encoder_channel_count_differential",
    "Encoder_channel_count_single_ended",
    "Counter_channel_count",
    "CAN_channel_count",
    "UART_channel_count",
    "MIL1553_channel_count",
    "A429_tx_channel_count",
    "A429_rx_channel_count",
    "AFDX_channel_count",
    "SPI_channel_count",
    "SSI_channel_count",
    "Endat_channel_count",
    "BISSC_channel_count",
    "SENT_channel_count",
    "PSI5_channel_count",
    "I2C_channel_count",
    "PCM_channel_count",
    "LVDS_channel_count",
    "RDC_SDC_channel_count",
    "LVDT_RVDT_channel_count",
    "RTD_channel_count",
    "PPS_input_channel_count",
    "PPS_output_channel_count",
    "FPGA_fiber_channel_count",
    "Motion_DA_channel_count",
    "Motion_AD_channel_count",
    "Motion_encoder_input_channel_count",
    "Motion_enable_reset_channel_count",
    "Motion_pulse_output_channel_count",
    "Power_output_channel_count",
];

/// 通道类型数量（39）
pub const CHANNEL_COUNT: usize = CHANNEL_COUNT_FIELDS.len();

/// 判断字段是否为通道计数字段（大小写不敏感）
pub fn is_channel_count_field(field: &str) -> bool {
    CHANNEL_COUNT_FIELDS
        .iter()
        .any(|f| f.eq_ignore_ascii_case(field))
}

/// 查找通道计数字段的槽位下标（大小写不敏感）
pub fn channel_field_index(field: &str) -> Option<usize> {
    CHANNEL_COUNT_FIELDS
        .iter()
        .position(|f| f.eq_ignore_ascii_case(field))
}
